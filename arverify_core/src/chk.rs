/*!
# ArVerify: Matching
*/

use crate::Track;



/// # Match a Track Against Its Database Entries.
///
/// Every `(offset, entry)` pair lands in at most one bucket: primary-CRC
/// agreement (against either historic variant) is an exact match;
/// otherwise CRC450 agreement at a non-zero offset is a possible match.
///
/// A CRC450-only agreement at offset zero means nothing — the primary CRC
/// was computed over the very same samples and disagreed — so it is not
/// recorded.
///
/// Confidence values accumulate per offset in database submission order.
pub(crate) fn chk_track(track: &mut Track) {
	let (entries, checksums, exact, possible) = track.match_parts();
	for (&offset, crcs) in checksums {
		for entry in entries {
			if crcs.matches_crc(entry.crc()) {
				exact.entry(offset).or_default().push(entry.confidence());
			}
			else if offset != 0 && entry.crc450() == crcs.v450() {
				possible.entry(offset).or_default().push(entry.confidence());
			}
		}
	}
}
