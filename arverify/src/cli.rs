/*!
# ArVerify: CLI
*/

use argyle::Argument;
use arverify_core::{
	ArVerifyError,
	DataTrackLen,
	VerifyOptions,
};
use dactyl::traits::BytesToUnsigned;
use std::path::PathBuf;



/// # Parse Options.
///
/// Keyed options feed `VerifyOptions`; everything else is assumed to be an
/// input file, kept in the order given (the disc's track order).
pub(super) fn parse() -> Result<(Vec<PathBuf>, VerifyOptions), ArVerifyError> {
	let args = argyle::args()
		.with_keywords(include!(concat!(env!("OUT_DIR"), "/argyle.rs")));

	let mut opts = VerifyOptions::default();
	let mut paths = Vec::new();
	for arg in args {
		match arg {
			Argument::Key("-h" | "--help") => return Err(ArVerifyError::PrintHelp),
			Argument::Key("-v" | "--verbose") => { opts = opts.with_verbose(true); },
			Argument::Key("-V" | "--version") => return Err(ArVerifyError::PrintVersion),

			Argument::KeyWithValue("-a" | "--additional-sectors", s) => {
				let s = u32::btou(s.trim().as_bytes())
					.ok_or(ArVerifyError::CliParse("-a/--additional-sectors"))?;
				opts = opts.with_additional_sectors(s);
			},
			Argument::KeyWithValue("-d" | "--data-track-length", s) => {
				opts = opts.with_data_track(DataTrackLen::try_from(s.as_str())?);
			},

			Argument::Other(s) => { paths.push(PathBuf::from(s)); },
			Argument::InvalidUtf8(s) => { paths.push(PathBuf::from(s)); },

			_ => {},
		}
	}

	// The inputs need to be real files.
	for path in &paths {
		if ! path.is_file() {
			return Err(ArVerifyError::InvalidPath(path.to_string_lossy().into_owned()));
		}
	}
	if paths.is_empty() { return Err(ArVerifyError::NoTracks); }

	Ok((paths, opts))
}
