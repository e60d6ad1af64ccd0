/*!
# ArVerify: Disc Identifiers
*/

use crate::{
	ArVerifyError,
	LEADOUT_GAP_SECTORS,
	SAMPLES_PER_SECOND,
	SAMPLES_PER_SECTOR,
	SECTORS_PER_SECOND,
};
use dactyl::traits::BytesToUnsigned;
use std::fmt;



#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
/// # Data Track Length.
///
/// The sector length of a trailing data track, parsed from either a raw
/// sector count or an `mm:ss.ff` timecode. Zero means the disc has no data
/// track.
pub struct DataTrackLen(u64);

impl DataTrackLen {
	#[must_use]
	/// # Length in Sectors.
	pub const fn sectors(self) -> u64 { self.0 }
}

impl TryFrom<&str> for DataTrackLen {
	type Error = ArVerifyError;

	fn try_from(src: &str) -> Result<Self, Self::Error> {
		let src = src.trim();
		if src.is_empty() { return Err(ArVerifyError::DataTrackLen); }

		// A plain sector count.
		if let Some(v) = u64::btou(src.as_bytes()) { return Ok(Self(v)); }

		// Otherwise it should be a timecode. The last component holds
		// frames (1/75s); the rest accumulate into seconds from the right.
		let mut parts: Vec<&str> = src.split([':', '.']).collect();
		let frames = parts.pop()
			.and_then(|v| u64::btou(v.as_bytes()))
			.ok_or(ArVerifyError::DataTrackLen)?;

		let mut seconds = 0;
		let mut multiplier = 1;
		for v in parts.iter().rev() {
			let v = u64::btou(v.as_bytes()).ok_or(ArVerifyError::DataTrackLen)?;
			seconds += multiplier * v;
			multiplier *= 60;
		}

		Ok(Self(frames + seconds * SAMPLES_PER_SECOND / SAMPLES_PER_SECTOR))
	}
}



#[derive(Debug, Clone, Copy, Eq, PartialEq)]
/// # Disc Identifiers.
///
/// The composite lookup key for a disc: two AccurateRip sums and a
/// CDDB-style id, all derived from the track sector boundaries.
///
/// The values are computed once per run and double as the yardstick the
/// fetched response is validated against.
pub struct DiscId {
	cddb: u32,
	id1: u32,
	id2: u32,
}

impl fmt::Display for DiscId {
	#[inline]
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{:08x}-{:08x}-{:08x}", self.id1, self.id2, self.cddb)
	}
}

impl DiscId {
	#[must_use]
	/// # New.
	///
	/// Derive the identifiers from the per-track sector counts, any
	/// additional pregap sectors, and the trailing data track length, if
	/// any.
	///
	/// Track boundaries accumulate into an offset list — one entry before
	/// each track plus the trailing edge — and everything falls out of
	/// that: `id1` sums the offsets, `id2` sums them weighted by 1-based
	/// track number (with zero offsets counting as one), and the CDDB id
	/// packs a digit-sum, the disc length in seconds, and the track count
	/// into its byte lanes.
	///
	/// A data track extends the list by one more boundary and widens the
	/// final audio offset by the standard lead-out gap.
	pub fn new(sectors: &[u32], additional_sectors: u32, data_track: DataTrackLen) -> Self {
		let mut offsets: Vec<u64> = Vec::with_capacity(sectors.len() + 2);
		let mut cur = u64::from(additional_sectors);
		offsets.push(cur);
		for &s in sectors {
			cur += u64::from(s);
			offsets.push(cur);
		}

		let mut id1: u64 = 0;
		let mut id2: u64 = 0;
		for (number, &offset) in (1_u64..).zip(offsets.iter()) {
			id1 += offset;
			id2 += number * offset.max(1);
		}

		let data_track = data_track.sectors();
		if data_track != 0 {
			id1 += data_track + LEADOUT_GAP_SECTORS;
			id2 += (data_track + LEADOUT_GAP_SECTORS) * offsets.len() as u64;

			let last = offsets.len() - 1;
			offsets[last] += LEADOUT_GAP_SECTORS;
			let edge = offsets[last] + data_track;
			offsets.push(edge);
		}

		let last = offsets[offsets.len() - 1] / SECTORS_PER_SECOND;
		let first = offsets[0] / SECTORS_PER_SECOND;
		let mut cddb: u64 = offsets[..offsets.len() - 1].iter()
			.map(|&o| digit_sum(o / SECTORS_PER_SECOND + 2))
			.sum();
		cddb = ((cddb % 255) << 24) + ((last - first) << 8) + (offsets.len() as u64 - 1);

		Self {
			cddb: (cddb & 0xFFFF_FFFF) as u32,
			id1: (id1 & 0xFFFF_FFFF) as u32,
			id2: (id2 & 0xFFFF_FFFF) as u32,
		}
	}
}

impl DiscId {
	#[must_use]
	/// # CDDB Id.
	pub const fn cddb(self) -> u32 { self.cddb }

	#[must_use]
	/// # First AccurateRip Id.
	pub const fn id1(self) -> u32 { self.id1 }

	#[must_use]
	/// # Second AccurateRip Id.
	pub const fn id2(self) -> u32 { self.id2 }
}



/// # Decimal Digit Sum.
const fn digit_sum(mut n: u64) -> u64 {
	let mut sum = 0;
	while n != 0 {
		sum += n % 10;
		n /= 10;
	}
	sum
}



#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn t_data_track_len() {
		for (raw, expected) in [
			("30", 30),
			(" 11400 ", 11_400),
			("00:32.12", 32 * 75 + 12),
			("2:30.45", 150 * 75 + 45),
			("1:00:00", 60 * 75),
		] {
			assert_eq!(
				DataTrackLen::try_from(raw).map(DataTrackLen::sectors),
				Ok(expected),
				"Data track length {raw} parsed wrong.",
			);
		}

		for raw in ["", "abc", "12:", "-5", "1::2"] {
			assert!(
				DataTrackLen::try_from(raw).is_err(),
				"Data track length {raw} should not parse.",
			);
		}
	}

	#[test]
	fn t_disc_id() {
		// One track of exactly 75 sectors, nothing fancy.
		let ids = DiscId::new(&[75], 0, DataTrackLen::default());
		assert_eq!(ids.id1(), 0x0000_004b);
		assert_eq!(ids.id2(), 0x0000_0097);
		assert_eq!(ids.cddb(), 0x0200_0101);
		assert_eq!(ids.to_string(), "0000004b-00000097-02000101");

		// The derivation is pure; a second pass must agree.
		assert_eq!(ids, DiscId::new(&[75], 0, DataTrackLen::default()));
	}

	#[test]
	fn t_disc_id_data_track() {
		// Pregap and data track shift everything.
		let ids = DiscId::new(&[100, 200], 5, DataTrackLen(30));
		assert_eq!(ids.id1(), 0x0000_2e45);
		assert_eq!(ids.id2(), 0x0000_8a5c);
		assert_eq!(ids.cddb(), 0x1300_9c03);
	}
}
