/*!
# ArVerify: Tracks
*/

use crate::{
	AHASHER,
	ArVerifyError,
	SAMPLES_PER_SECTOR,
};
use std::{
	collections::{
		BTreeMap,
		HashMap,
	},
	fmt,
	path::{
		Path,
		PathBuf,
	},
};



/// # Confidence Values by Offset.
///
/// Insertion preserves database submission order within each offset.
pub(crate) type MatchMap = BTreeMap<i32, Vec<u8>>;



#[derive(Debug, Clone, Copy, Eq, PartialEq)]
/// # Database Entry.
///
/// One submission record fetched from AccurateRip for a track. The primary
/// CRC may follow either of the two checksum algorithms the database has
/// used over the years; there's no way to tell which from the data itself.
pub struct DbEntry {
	crc: u32,
	crc450: u32,
	confidence: u8,
}

impl fmt::Display for DbEntry {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"{:<20}: CRC: {:08X}, Confidence: {:>3}, CRC450: {:08X}",
			"Database entry",
			self.crc,
			self.confidence,
			self.crc450,
		)
	}
}

impl DbEntry {
	/// # New.
	pub(crate) const fn new(crc: u32, crc450: u32, confidence: u8) -> Self {
		Self { crc, crc450, confidence }
	}

	#[must_use]
	/// # Primary CRC.
	pub const fn crc(&self) -> u32 { self.crc }

	#[must_use]
	/// # CRC450.
	pub const fn crc450(&self) -> u32 { self.crc450 }

	#[must_use]
	/// # Confidence.
	pub const fn confidence(&self) -> u8 { self.confidence }
}



#[derive(Debug, Clone, Copy, Eq, PartialEq)]
/// # Computed Checksums.
///
/// The checksums the external pipeline computed for a track at one
/// particular sample offset. The second primary variant is only emitted
/// for some offsets, hence the option.
pub(crate) struct ComputedCrcs {
	v1: u32,
	v450: u32,
	v2: Option<u32>,
}

impl ComputedCrcs {
	/// # New.
	pub(crate) const fn new(v1: u32, v450: u32, v2: Option<u32>) -> Self {
		Self { v1, v450, v2 }
	}

	/// # Primary CRC (First Variant).
	pub(crate) const fn v1(self) -> u32 { self.v1 }

	/// # Primary CRC (Second Variant).
	pub(crate) const fn v2(self) -> Option<u32> { self.v2 }

	/// # CRC450.
	pub(crate) const fn v450(self) -> u32 { self.v450 }

	/// # Does a Database CRC Match Either Primary Variant?
	pub(crate) fn matches_crc(self, crc: u32) -> bool {
		self.v1 == crc || self.v2 == Some(crc)
	}
}



#[derive(Debug)]
/// # Track.
///
/// One input file under verification, from probe to report: its sample and
/// sector counts, the database entries fetched for it, the checksums
/// computed for it at each offset, and the match results.
pub struct Track {
	path: PathBuf,
	samples: u64,
	sectors: u32,
	entries: Vec<DbEntry>,
	checksums: HashMap<i32, ComputedCrcs, ahash::RandomState>,
	exact: MatchMap,
	possible: MatchMap,
}

impl Track {
	/// # New.
	///
	/// ## Errors
	///
	/// This will return an error if the sample count is not evenly
	/// divisible into sectors — such a file cannot have come from a CD —
	/// or overflows the sector math.
	pub fn new(path: PathBuf, samples: u64) -> Result<Self, ArVerifyError> {
		if samples % SAMPLES_PER_SECTOR != 0 {
			return Err(ArVerifyError::NotFromCd(
				path.to_string_lossy().into_owned(),
				samples,
			));
		}
		let sectors = u32::try_from(samples / SAMPLES_PER_SECTOR)
			.map_err(|_| ArVerifyError::Overflow)?;

		Ok(Self {
			path,
			samples,
			sectors,
			entries: Vec::new(),
			checksums: HashMap::with_hasher(AHASHER),
			exact: MatchMap::new(),
			possible: MatchMap::new(),
		})
	}
}

impl Track {
	#[must_use]
	/// # Path.
	pub fn path(&self) -> &Path { &self.path }

	#[must_use]
	/// # Total Samples.
	pub const fn samples(&self) -> u64 { self.samples }

	#[must_use]
	/// # Total Sectors.
	pub const fn sectors(&self) -> u32 { self.sectors }

	#[must_use]
	/// # Database Entries.
	pub fn entries(&self) -> &[DbEntry] { &self.entries }

	#[must_use]
	/// # Total Submissions.
	///
	/// The sum of confidence over every database entry, matched or not.
	pub fn submissions(&self) -> u64 {
		self.entries.iter().map(|e| u64::from(e.confidence)).sum()
	}

	/// # Computed Checksums at Zero Offset.
	pub(crate) fn calc(&self) -> Option<&ComputedCrcs> { self.checksums_at(0) }

	/// # Computed Checksums at an Offset.
	pub(crate) fn checksums_at(&self, offset: i32) -> Option<&ComputedCrcs> {
		self.checksums.get(&offset)
	}

	/// # Exact Matches.
	pub(crate) const fn exact(&self) -> &MatchMap { &self.exact }

	/// # Possible Matches.
	pub(crate) const fn possible(&self) -> &MatchMap { &self.possible }

	/// # Append a Database Entry.
	pub(crate) fn push_entry(&mut self, entry: DbEntry) { self.entries.push(entry); }

	/// # Record the Computed Checksums for an Offset.
	pub(crate) fn set_checksums(&mut self, offset: i32, crcs: ComputedCrcs) {
		self.checksums.insert(offset, crcs);
	}

	/// # Split-Borrow the Matching Inputs and Outputs.
	pub(crate) fn match_parts(&mut self) -> (
		&[DbEntry],
		&HashMap<i32, ComputedCrcs, ahash::RandomState>,
		&mut MatchMap,
		&mut MatchMap,
	) {
		(&self.entries, &self.checksums, &mut self.exact, &mut self.possible)
	}
}



#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn t_track_new() {
		let track = Track::new(PathBuf::from("01.flac"), 588 * 100)
			.expect("Track failed.");
		assert_eq!(track.sectors(), 100);
		assert_eq!(track.samples(), 58_800);
		assert_eq!(track.submissions(), 0);

		// Not sector-aligned, not from a CD.
		assert!(matches!(
			Track::new(PathBuf::from("01.flac"), 100),
			Err(ArVerifyError::NotFromCd(_, 100)),
		));
	}

	#[test]
	fn t_track_submissions() {
		let mut track = Track::new(PathBuf::from("01.flac"), 588).expect("Track failed.");
		track.push_entry(DbEntry::new(1, 2, 5));
		track.push_entry(DbEntry::new(3, 4, 7));
		assert_eq!(track.submissions(), 12);
	}
}
