/*!
# ArVerify: Sample Counting
*/

use crate::{
	ArVerifyError,
	Dependencies,
	SAMPLES_PER_SECOND,
};
use std::{
	path::Path,
	process::{
		Command,
		Stdio,
	},
};
use trimothy::TrimSlice;



/// # Count a File's Samples.
///
/// FLAC files get the exact total straight from `metaflac` when it's
/// around; everything else goes through `ffprobe`, whose reported duration
/// is rounded to samples at 44.1kHz.
///
/// ## Errors
///
/// This will return an error naming the file if the count cannot be
/// obtained, whichever prober was asked.
pub(crate) fn num_samples(deps: &Dependencies, path: &Path)
-> Result<u64, ArVerifyError> {
	let flac = path.extension().is_some_and(|e| e.eq_ignore_ascii_case("flac"));
	let out = match deps.metaflac() {
		Some(metaflac) if flac => probe_metaflac(metaflac, path),
		_ => probe_ffprobe(deps.ffprobe(), path),
	};
	out.ok_or_else(|| ArVerifyError::SampleCount(path.to_string_lossy().into_owned()))
}

/// # Exact FLAC Sample Count.
fn probe_metaflac(bin: &Path, path: &Path) -> Option<u64> {
	use dactyl::traits::BytesToUnsigned;

	let out = Command::new(bin)
		.arg("--show-total-samples")
		.arg(path)
		.stderr(Stdio::null())
		.output()
		.ok()?;
	if out.status.success() { u64::btou(out.stdout.trim()) }
	else { None }
}

/// # Duration-Derived Sample Count.
///
/// `ffprobe -show_streams` emits `key=value` lines; the stream duration is
/// all we're after.
fn probe_ffprobe(bin: &Path, path: &Path) -> Option<u64> {
	let out = Command::new(bin)
		.arg("-show_streams")
		.arg(path)
		.stderr(Stdio::null())
		.output()
		.ok()?;
	if ! out.status.success() { return None; }

	let raw = String::from_utf8_lossy(&out.stdout);
	for line in raw.lines() {
		if let Some(dur) = line.trim().strip_prefix("duration=") {
			let dur: f64 = dur.trim().parse().ok()?;
			if ! dur.is_finite() || dur < 0.0 { return None; }
			return Some((dur * SAMPLES_PER_SECOND as f64).round() as u64);
		}
	}

	None
}
