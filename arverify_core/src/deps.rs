/*!
# ArVerify: Dependencies
*/

use crate::ArVerifyError;
use std::path::{
	Path,
	PathBuf,
};



#[derive(Debug, Clone)]
/// # External Collaborators.
///
/// The helper programs verification leans on: `metaflac` for quick FLAC
/// sample counts (optional), `ffprobe`/`avprobe` for everything else,
/// `sox` to decode the audio, and `ckcdda` to crunch the checksums.
///
/// Discovery happens before any file or network I/O so a missing tool
/// fails fast instead of mid-run.
pub struct Dependencies {
	metaflac: Option<PathBuf>,
	ffprobe: PathBuf,
	sox: PathBuf,
	ckcdda: PathBuf,
}

impl Dependencies {
	/// # Find the Helpers.
	///
	/// Each is searched for on the executable `PATH`, then beside the
	/// running program itself (`ckcdda` often ships that way).
	///
	/// ## Errors
	///
	/// This will return an error naming the first required tool that
	/// cannot be found.
	pub fn find() -> Result<Self, ArVerifyError> {
		let ffprobe = which("ffprobe")
			.or_else(|| which("avprobe"))
			.ok_or(ArVerifyError::Dependency("ffprobe/avprobe"))?;
		let sox = which("sox").ok_or(ArVerifyError::Dependency("sox"))?;
		let ckcdda = which("ckcdda").ok_or(ArVerifyError::Dependency("ckcdda"))?;

		Ok(Self {
			metaflac: which("metaflac"),
			ffprobe,
			sox,
			ckcdda,
		})
	}

	#[must_use]
	/// # Metaflac.
	pub fn metaflac(&self) -> Option<&Path> { self.metaflac.as_deref() }

	#[must_use]
	/// # FFprobe (or AVprobe).
	pub fn ffprobe(&self) -> &Path { &self.ffprobe }

	#[must_use]
	/// # SoX.
	pub fn sox(&self) -> &Path { &self.sox }

	#[must_use]
	/// # Ckcdda.
	pub fn ckcdda(&self) -> &Path { &self.ckcdda }
}



/// # Find an Executable.
///
/// Walk the `PATH` entries, then the running program's own directory,
/// returning the first hit that is an executable file.
fn which(name: &str) -> Option<PathBuf> {
	let exe_dir = std::env::current_exe().ok()
		.and_then(|p| p.parent().map(Path::to_path_buf));

	std::env::var_os("PATH")
		.map(|raw| std::env::split_paths(&raw).collect::<Vec<_>>())
		.unwrap_or_default()
		.into_iter()
		.chain(exe_dir)
		.map(|dir| dir.join(name))
		.find(|p| is_executable(p))
}

#[cfg(unix)]
/// # Is It an Executable File?
fn is_executable(path: &Path) -> bool {
	use std::os::unix::fs::PermissionsExt;

	path.is_file() &&
	std::fs::metadata(path).is_ok_and(|m| m.permissions().mode() & 0o111 != 0)
}

#[cfg(not(unix))]
/// # Is It an Executable File?
fn is_executable(path: &Path) -> bool { path.is_file() }
