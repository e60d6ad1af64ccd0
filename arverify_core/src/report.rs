/*!
# ArVerify: Reporting
*/

use crate::Track;
use dactyl::NiceU64;
use oxford_join::JoinFmt;
use std::collections::BTreeMap;



/// # Absent-From-Database Line.
const NOT_PRESENT_MSG: &str = "Not present in database";



#[derive(Debug, Clone, Copy, Eq, PartialEq)]
/// # Match Kind.
enum MatchKind {
	/// # Primary CRC Agreement.
	Exact,

	/// # CRC450 Agreement (Non-Zero Offset).
	Possible,
}

impl MatchKind {
	/// # Lead-In Text.
	const fn msg(self) -> &'static str {
		match self {
			Self::Exact => "Accurately ripped",
			Self::Possible => "Possibly accurately ripped",
		}
	}
}



#[derive(Debug, Default)]
/// # Album Tally.
///
/// Per-offset results collected across every track, plus the stragglers,
/// for the album-level rollup. Each offset holds one
/// `(summed confidence, total submissions)` pair per matching track.
struct Tally {
	exact: BTreeMap<i32, Vec<(u64, u64)>>,
	possible: BTreeMap<i32, Vec<(u64, u64)>>,
	not_present: usize,
	not_accurate: usize,
}

impl Tally {
	/// # Record One Track/Offset Result.
	fn push(&mut self, kind: MatchKind, offset: i32, sum: u64, submissions: u64) {
		let map = match kind {
			MatchKind::Exact => &mut self.exact,
			MatchKind::Possible => &mut self.possible,
		};
		map.entry(offset).or_default().push((sum, submissions));
	}
}



/// # Print the Full Report.
///
/// Per-track blocks first, then the album-level rollup, all on STDOUT.
/// Returns the number of tracks that definitely did not match — the
/// process exit status.
pub(crate) fn summarize(tracks: &[Track], verbose: bool) -> usize {
	use std::io::Write;

	let mut tally = Tally::default();
	let blocks: Vec<String> = tracks.iter()
		.map(|t| track_block(t, verbose, &mut tally))
		.collect();

	let writer = std::io::stdout();
	let mut handle = writer.lock();
	let _res = writeln!(&mut handle, "{}", blocks.join("\n\n"));
	let _res = writeln!(&mut handle, "\n{}", "=".repeat(80));
	for line in album_lines(&tally, tracks.len()) {
		let _res = writeln!(&mut handle, "{line}");
	}
	let _res = handle.flush();

	tally.not_accurate
}

/// # One Track's Block.
///
/// The path, the calculated checksums (plus CRC450 and the raw database
/// entries when verbose), a separator, and one line per matched offset —
/// or the absent/not-accurate line when nothing matched.
fn track_block(track: &Track, verbose: bool, tally: &mut Tally) -> String {
	let mut lines = vec![track.path().display().to_string()];

	if let Some(calc) = track.calc() {
		lines.push(format!("{:<20}: {:08X}", "Calculated CRCv1", calc.v1()));
		if let Some(v2) = calc.v2() {
			lines.push(format!("{:<20}: {v2:08X}", "Calculated CRCv2"));
		}
		if verbose {
			lines.push(format!("{:<20}: {:08X}", "Calculated CRC450", calc.v450()));
		}
	}
	if verbose {
		for entry in track.entries() { lines.push(entry.to_string()); }
	}
	lines.push("-".repeat(lines.last().map_or(20, String::len)));

	let submissions = track.submissions();
	let mut matched = false;
	for (kind, matches) in [
		(MatchKind::Exact, track.exact()),
		(MatchKind::Possible, track.possible()),
	] {
		for (&offset, confidences) in matches {
			matched = true;
			let sum: u64 = confidences.iter().copied().map(u64::from).sum();
			lines.push(match_line(kind, offset, confidences, sum, submissions));
			tally.push(kind, offset, sum, submissions);
		}
	}

	if submissions == 0 {
		lines.push(NOT_PRESENT_MSG.to_owned());
		tally.not_present += 1;
	}
	else if ! matched {
		lines.push(format!(
			"***Definitely not accurately ripped (total {} submission{})***",
			NiceU64::from(submissions),
			if submissions == 1 { "" } else { "s" },
		));
		tally.not_accurate += 1;
	}

	lines.join("\n    ")
}

/// # One Matched-Offset Line.
///
/// The confidences are `+`-joined individually; the `/total` ratio only
/// appears when some submissions didn't agree.
fn match_line(kind: MatchKind, offset: i32, confidences: &[u8], sum: u64, submissions: u64)
-> String {
	use std::fmt::Write;

	let mut out = String::from(kind.msg());
	if offset != 0 {
		let _res = write!(&mut out, " with offset {offset}");
	}
	let _res = write!(&mut out, " (confidence {}", JoinFmt::new(confidences.iter(), "+"));
	if sum != submissions {
		let _res = write!(&mut out, "/{submissions}");
	}
	out.push(')');
	out
}

/// # Album-Level Rollup Lines.
///
/// Exact offsets are ordered by absolute value — zero first, then the
/// nearest shifts — possible offsets plainly ascending. Each line carries
/// the best summed confidence any one track managed at that offset, not a
/// total across tracks.
fn album_lines(tally: &Tally, total: usize) -> Vec<String> {
	let width = if total < 10 { 1 } else { 2 };
	let mut out = Vec::new();

	let mut exact: Vec<_> = tally.exact.iter().collect();
	exact.sort_by_key(|(offset, _)| offset.unsigned_abs());
	for (&offset, hits) in exact {
		out.push(album_line(width, hits, total, MatchKind::Exact, offset));
	}
	for (&offset, hits) in &tally.possible {
		out.push(album_line(width, hits, total, MatchKind::Possible, offset));
	}

	if tally.not_accurate != 0 {
		out.push(format!(
			"{:>width$}/{:>width$} ***Definitely not accurately ripped***",
			tally.not_accurate,
			total,
		));
	}
	if tally.not_present != 0 {
		out.push(format!(
			"{:>width$}/{:>width$} {NOT_PRESENT_MSG}",
			tally.not_present,
			total,
		));
	}

	out
}

/// # One Album Rollup Line.
fn album_line(width: usize, hits: &[(u64, u64)], total: usize, kind: MatchKind, offset: i32)
-> String {
	use std::fmt::Write;

	let confidence = hits.iter().map(|&(sum, _)| sum).max().unwrap_or(0);
	let mut out = format!(
		"{:>width$}/{total:>width$} {}",
		hits.len(),
		kind.msg(),
	);
	if offset != 0 {
		let _res = write!(&mut out, " with offset {offset}");
	}
	let _res = write!(&mut out, " (confidence {confidence})");
	out
}



#[cfg(test)]
mod tests {
	use super::*;
	use crate::{
		chk_track,
		ComputedCrcs,
		DbEntry,
		Track,
	};
	use std::path::PathBuf;

	/// # One-Track Test Fixture.
	fn test_track() -> Track {
		Track::new(PathBuf::from("01.flac"), 588 * 75).expect("Track failed.")
	}

	#[test]
	fn t_report_accurate() {
		// The canonical happy path: one track, one entry, a dead-on
		// zero-offset match.
		let mut track = test_track();
		track.push_entry(DbEntry::new(0xAABB_CCDD, 0x1122_3344, 5));
		track.set_checksums(0, ComputedCrcs::new(0xAABB_CCDD, 0x1122_3344, None));
		chk_track(&mut track);

		let mut tally = Tally::default();
		let block = track_block(&track, false, &mut tally);
		assert!(block.starts_with("01.flac\n"));
		assert!(block.contains("Calculated CRCv1    : AABBCCDD"));
		assert!(block.ends_with("Accurately ripped (confidence 5)"));
		assert!(! block.contains("with offset"));
		assert_eq!(tally.not_accurate, 0);
		assert_eq!(tally.not_present, 0);

		let album = album_lines(&tally, 1);
		assert_eq!(album, ["1/1 Accurately ripped (confidence 5)"]);
	}

	#[test]
	fn t_report_ratio() {
		// Only five of twelve submissions agreed; the line says so.
		let mut track = test_track();
		track.push_entry(DbEntry::new(0xAABB_CCDD, 0x1122_3344, 5));
		track.push_entry(DbEntry::new(0x0102_0304, 0x0506_0708, 7));
		track.set_checksums(6, ComputedCrcs::new(0xAABB_CCDD, 0, None));
		chk_track(&mut track);

		let mut tally = Tally::default();
		let block = track_block(&track, false, &mut tally);
		assert!(block.ends_with("Accurately ripped with offset 6 (confidence 5/12)"));
	}

	#[test]
	fn t_report_not_present() {
		// No database entries at all.
		let track = test_track();
		let mut tally = Tally::default();
		let block = track_block(&track, false, &mut tally);
		assert!(block.ends_with(NOT_PRESENT_MSG));
		assert_eq!(tally.not_present, 1);
		assert_eq!(tally.not_accurate, 0);

		let album = album_lines(&tally, 1);
		assert_eq!(album, ["1/1 Not present in database"]);
	}

	#[test]
	fn t_report_not_accurate() {
		// Entries, but nothing agreed at any offset.
		let mut track = test_track();
		track.push_entry(DbEntry::new(0xAABB_CCDD, 0x1122_3344, 7));
		track.set_checksums(0, ComputedCrcs::new(0x0102_0304, 0x0506_0708, None));
		chk_track(&mut track);

		let mut tally = Tally::default();
		let block = track_block(&track, false, &mut tally);
		assert!(block.ends_with("***Definitely not accurately ripped (total 7 submissions)***"));
		assert_eq!(tally.not_accurate, 1);

		let album = album_lines(&tally, 1);
		assert_eq!(album, ["1/1 ***Definitely not accurately ripped***"]);
	}

	#[test]
	fn t_report_verbose() {
		let mut track = test_track();
		track.push_entry(DbEntry::new(0xAABB_CCDD, 0x1122_3344, 5));
		track.set_checksums(0, ComputedCrcs::new(0xAABB_CCDD, 0x1122_3344, Some(0x0102_0304)));
		chk_track(&mut track);

		let mut tally = Tally::default();
		let block = track_block(&track, true, &mut tally);
		assert!(block.contains("Calculated CRCv2    : 01020304"));
		assert!(block.contains("Calculated CRC450   : 11223344"));
		assert!(block.contains("Database entry      : CRC: AABBCCDD, Confidence:   5, CRC450: 11223344"));
	}

	#[test]
	fn t_album_tiebreak() {
		// Two tracks matched the same offset with different summed
		// confidences; the rollup reports the higher, not a total.
		let mut tally = Tally::default();
		tally.push(MatchKind::Exact, 6, 8, 10);
		tally.push(MatchKind::Exact, 6, 3, 10);
		tally.push(MatchKind::Exact, 0, 2, 10);

		let album = album_lines(&tally, 2);
		assert_eq!(
			album,
			[
				"1/2 Accurately ripped (confidence 2)",
				"2/2 Accurately ripped with offset 6 (confidence 8)",
			],
		);
	}

	#[test]
	fn t_album_ordering() {
		// Exact offsets order by absolute value; possible offsets order
		// plainly ascending.
		let mut tally = Tally::default();
		tally.push(MatchKind::Exact, 30, 1, 1);
		tally.push(MatchKind::Exact, -6, 2, 2);
		tally.push(MatchKind::Exact, 0, 3, 3);
		tally.push(MatchKind::Possible, 12, 1, 1);
		tally.push(MatchKind::Possible, -24, 1, 1);

		let album = album_lines(&tally, 1);
		assert_eq!(
			album,
			[
				"1/1 Accurately ripped (confidence 3)",
				"1/1 Accurately ripped with offset -6 (confidence 2)",
				"1/1 Accurately ripped with offset 30 (confidence 1)",
				"1/1 Possibly accurately ripped with offset -24 (confidence 1)",
				"1/1 Possibly accurately ripped with offset 12 (confidence 1)",
			],
		);
	}
}
