/*!
# ArVerify: Checksum Pipeline
*/

use crate::{
	ArVerifyError,
	ComputedCrcs,
	Dependencies,
	KillSwitch,
	Track,
};
use dactyl::NiceElapsed;
use fyi_msg::{
	Msg,
	Progless,
};
use std::{
	io::{
		Read,
		Seek,
		SeekFrom,
	},
	process::{
		Child,
		Command,
		Stdio,
	},
	time::Instant,
};



/// # Run the External Checksum Pipeline.
///
/// `sox` decodes every input into one raw byte stream; `ckcdda` consumes
/// it — primed with each track's sector count and candidate CRCs so it can
/// bound its offset search — and prints checksums per `(track, offset)`
/// pair. Both are left to run to completion (the progress bar animates
/// from its own thread), after which the captured output is parsed in one
/// go.
///
/// ## Errors
///
/// This will return an error if either helper cannot be spawned, exits
/// non-zero, or the run is interrupted.
pub(crate) fn scan(
	deps: &Dependencies,
	tracks: &mut [Track],
	progress: &Progless,
	killed: KillSwitch,
) -> Result<(), ArVerifyError> {
	let started = Instant::now();

	// Decoded audio flows sox -> ckcdda; checksums land in a scratch file
	// rather than a pipe we'd have to drain concurrently.
	let mut sox = Command::new(deps.sox())
		.args(tracks.iter().map(|t| t.path().as_os_str()))
		.args(["-t", "raw", "-"])
		.stdout(Stdio::piped())
		.spawn()
		.map_err(|_| ArVerifyError::Spawn("sox"))?;
	let audio = sox.stdout.take().ok_or(ArVerifyError::Spawn("sox"))?;

	// From here on the children need reaping no matter how we exit.
	let mut guard = PipelineGuard { sox, ckcdda: None };

	let mut scratch = tempfile::tempfile().map_err(|_| ArVerifyError::Scratch)?;
	let ckcdda = Command::new(deps.ckcdda())
		.args(ckcdda_args(tracks))
		.stdin(Stdio::from(audio))
		.stdout(scratch.try_clone().map_err(|_| ArVerifyError::Scratch)?)
		.spawn()
		.map_err(|_| ArVerifyError::Spawn("ckcdda"))?;
	guard.ckcdda.replace(ckcdda);

	let _res = progress.reset(1);
	progress.set_title(Some(Msg::custom("Checksums", 199, &format!(
		"Calculating checksums for {} file{}…",
		tracks.len(),
		if tracks.len() == 1 { "" } else { "s" },
	))));

	let res = guard.wait(killed);
	progress.increment();
	progress.finish();
	res?;

	Msg::custom("Checksummed", 10, &format!(
		"{} file{} in {}.",
		tracks.len(),
		if tracks.len() == 1 { "" } else { "s" },
		NiceElapsed::from(u32::try_from(started.elapsed().as_secs()).unwrap_or(u32::MAX)),
	))
		.with_newline(true)
		.eprint();

	// Read back what ckcdda had to say.
	let mut out = String::new();
	scratch.seek(SeekFrom::Start(0)).map_err(|_| ArVerifyError::Scratch)?;
	scratch.read_to_string(&mut out).map_err(|_| ArVerifyError::Scratch)?;
	parse_output(tracks, &out);

	Ok(())
}



/// # Pipeline Guard.
///
/// Owns both children so they get reaped — or killed, if still running —
/// no matter how the scan unwinds, interrupts included.
struct PipelineGuard {
	sox: Child,
	ckcdda: Option<Child>,
}

impl Drop for PipelineGuard {
	fn drop(&mut self) {
		for child in std::iter::once(&mut self.sox).chain(self.ckcdda.as_mut()) {
			if ! matches!(child.try_wait(), Ok(Some(_))) {
				let _res = child.kill();
				let _res = child.wait();
			}
		}
	}
}

impl PipelineGuard {
	/// # Block Until Both Children Finish.
	///
	/// The consumer is waited on first; the producer necessarily finishes
	/// with it. An interrupt outranks whatever exit codes the (likely
	/// signalled) children report.
	fn wait(&mut self, killed: KillSwitch) -> Result<(), ArVerifyError> {
		let mut statuses = [("ckcdda", None), ("sox", None)];
		if let Some(child) = self.ckcdda.as_mut() {
			statuses[0].1 = Some(child.wait().map_err(|_| ArVerifyError::Spawn("ckcdda"))?);
		}
		statuses[1].1 = Some(self.sox.wait().map_err(|_| ArVerifyError::Spawn("sox"))?);

		if killed.killed() { return Err(ArVerifyError::Killed); }

		for (name, status) in statuses {
			if let Some(status) = status {
				if ! status.success() {
					return Err(ArVerifyError::Subprocess(name, status.code().unwrap_or(-1)));
				}
			}
		}

		Ok(())
	}
}



/// # Ckcdda Argument List.
///
/// The widest entry count first, then per track: its sector count, its
/// candidate CRCs, and its candidate CRC450s, both zero-padded to that
/// width so every track occupies the same number of slots.
fn ckcdda_args(tracks: &[Track]) -> Vec<String> {
	let per_track = tracks.iter().map(|t| t.entries().len()).max().unwrap_or(0);

	let mut out = Vec::with_capacity(1 + tracks.len() * (1 + per_track * 2));
	out.push(per_track.to_string());
	for track in tracks {
		out.push(track.sectors().to_string());
		let mut crcs = Vec::with_capacity(per_track);
		let mut crc450s = Vec::with_capacity(per_track);
		for entry in track.entries() {
			crcs.push(entry.crc().to_string());
			crc450s.push(entry.crc450().to_string());
		}
		crcs.resize_with(per_track, || String::from("0"));
		crc450s.resize_with(per_track, || String::from("0"));
		out.append(&mut crcs);
		out.append(&mut crc450s);
	}

	out
}

/// # Parse the Pipeline Output.
///
/// Each useful line looks like `track,offset: hex hex [hex]` — primary
/// CRC, CRC450, and sometimes the second primary variant. Anything not
/// starting with a digit is diagnostic noise and skipped, as is anything
/// that doesn't scan.
fn parse_output(tracks: &mut [Track], raw: &str) {
	for line in raw.lines() {
		if ! line.as_bytes().first().is_some_and(u8::is_ascii_digit) { continue; }

		let Some((index, data)) = line.split_once(": ") else { continue; };
		let Some((track, offset)) = index.split_once(',') else { continue; };
		let Ok(track) = track.trim().parse::<usize>() else { continue; };
		let Ok(offset) = offset.trim().parse::<i32>() else { continue; };

		let mut hashes = data.split_whitespace()
			.map(|v| u32::from_str_radix(v, 16).ok());
		let Some(Some(v1)) = hashes.next() else { continue; };
		let Some(Some(v450)) = hashes.next() else { continue; };
		let v2 = match hashes.next() {
			Some(Some(v2)) => Some(v2),
			Some(None) => continue,
			None => None,
		};

		if let Some(track) = tracks.get_mut(track) {
			track.set_checksums(offset, ComputedCrcs::new(v1, v450, v2));
		}
	}
}



#[cfg(test)]
mod tests {
	use super::*;
	use crate::DbEntry;
	use std::path::PathBuf;

	/// # Test Tracks.
	fn test_tracks() -> Vec<Track> {
		let mut out: Vec<Track> = (0..2_u32)
			.map(|k| Track::new(
				PathBuf::from(format!("{:02}.flac", k + 1)),
				588 * u64::from(75 + k),
			).expect("Track failed."))
			.collect();
		out[0].push_entry(DbEntry::new(0xAABB_CCDD, 0x1122_3344, 5));
		out[0].push_entry(DbEntry::new(0x0102_0304, 0x0506_0708, 3));
		out[1].push_entry(DbEntry::new(0xDEAD_BEEF, 0xCAFE_D00D, 1));
		out
	}

	#[test]
	fn t_ckcdda_args() {
		let tracks = test_tracks();
		assert_eq!(
			ckcdda_args(&tracks),
			[
				"2",
				"75", "2864434397", "16909060", "287454020", "84281096",
				"76", "3735928559", "0", "3405762573", "0",
			],
		);
	}

	#[test]
	fn t_parse_output() {
		let mut tracks = test_tracks();
		let raw = "\
Reading 2 tracks…
0,0: aabbccdd 11223344 01020304
0,-6: 00000001 00000002
1,0: deadbeef cafed00d
1,12: zzzzzzzz 000000ff
9,0: aabbccdd 11223344
garbage
";
		parse_output(&mut tracks, raw);

		let calc = tracks[0].calc().expect("Missing checksums.");
		assert_eq!(calc.v1(), 0xAABB_CCDD);
		assert_eq!(calc.v450(), 0x1122_3344);
		assert_eq!(calc.v2(), Some(0x0102_0304));

		// Negative offsets scan too, without the second variant.
		let calc = tracks[0].checksums_at(-6).expect("Missing checksums.");
		assert_eq!(calc.v1(), 1);
		assert_eq!(calc.v450(), 2);
		assert_eq!(calc.v2(), None);

		// The second track's zero line landed; its garbled offset-12 line
		// and the out-of-range track index did not.
		assert!(tracks[1].calc().is_some());
		assert!(tracks[1].checksums_at(12).is_none());
	}
}
