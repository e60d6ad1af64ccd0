/*!
# ArVerify: Database Lookup
*/

use crate::{
	ArVerifyError,
	DbEntry,
	DiscId,
	Track,
};
use fyi_msg::Msg;
use std::{
	sync::OnceLock,
	time::Duration,
};
use ureq::{
	Agent,
	AgentBuilder,
};



/// # Connection Agent.
static AGENT: OnceLock<Agent> = OnceLock::new();

/// # Database Root.
const AR_ROOT: &str = "http://www.accuraterip.com/accuraterip";

/// # Block Header Size.
const HEADER_SIZE: usize = 13;

/// # Per-Track Entry Size.
const ENTRY_SIZE: usize = 9;



/// # Fetch and Decode the Database Entries.
///
/// One GET, no retry. The decoded entries are appended straight onto the
/// tracks they belong to.
///
/// A disc that simply isn't in the database comes back as an HTML error
/// page; that's a valid answer — every track ends up with zero entries —
/// not a failure.
///
/// ## Errors
///
/// This will return an error if the server is unreachable or the response
/// disagrees with the locally-computed identifiers.
pub(crate) fn fetch(ids: DiscId, tracks: &mut [Track], verbose: bool)
-> Result<(), ArVerifyError> {
	let url = lookup_url(ids, tracks.len());
	if verbose { Msg::info(url.as_str()).eprint(); }

	let raw = download(&url)?;
	decode(&raw, ids, tracks)
}

/// # Lookup URL.
///
/// The database shards its `.bin` files by the three low nibbles of `id1`,
/// then names them after the full composite key.
pub(crate) fn lookup_url(ids: DiscId, tracks: usize) -> String {
	let id1 = ids.id1();
	format!(
		"{AR_ROOT}/{:x}/{:x}/{:x}/dBAR-{tracks:03}-{id1:08x}-{:08x}-{:08x}.bin",
		id1 & 0xF,
		(id1 >> 4) & 0xF,
		(id1 >> 8) & 0xF,
		ids.id2(),
		ids.cddb(),
	)
}

/// # Connection Agent.
///
/// Storing the agent statically saves a little bit of overhead on reuse.
fn agent() -> &'static Agent {
	AGENT.get_or_init(||
		AgentBuilder::new()
			.timeout(Duration::from_secs(15))
			.user_agent(concat!(
				"Mozilla/5.0 (X11; Linux x86_64; rv:",
				env!("CARGO_PKG_VERSION"),
				") ArVerify/",
				env!("CARGO_PKG_VERSION"),
			))
			.max_idle_connections(0)
			.build()
	)
}

/// # Download.
///
/// Return the raw response body, or an empty vector if the database has
/// nothing for this disc.
fn download(url: &str) -> Result<Vec<u8>, ArVerifyError> {
	use std::io::Read;

	let (ok, res) = match agent().get(url).call() {
		Ok(res) => (true, res),
		Err(ureq::Error::Status(_, res)) => (false, res),
		Err(_) => return Err(ArVerifyError::Network),
	};

	let mut out = Vec::new();
	res.into_reader().read_to_end(&mut out).map_err(|_| ArVerifyError::Network)?;

	// The shared-hosting "not found" page stands in for a disc with no
	// submissions.
	if absent(&out) { Ok(Vec::new()) }
	else if ok { Ok(out) }
	else { Err(ArVerifyError::Network) }
}

/// # Absent From the Database?
///
/// Missing discs come back as a generic HTML error page rather than an
/// empty body; a crude substring check is all it takes to spot one.
fn absent(raw: &[u8]) -> bool {
	contains(raw, b"html") && contains(raw, b"404")
}

/// # Substring Search.
fn contains(haystack: &[u8], needle: &[u8]) -> bool {
	haystack.windows(needle.len()).any(|w| w == needle)
}

/// # Decode the Binary Response.
///
/// The body is any number of back-to-back blocks — one per submission
/// event — each a thirteen-byte header (track count and the three ids,
/// little-endian) followed by one nine-byte entry per track in submission
/// order. Short reads end decoding cleanly wherever they land; mismatched
/// headers poison the whole response.
///
/// ## Errors
///
/// This will return an error if any block header disagrees with the
/// locally-computed track count or identifiers.
pub(crate) fn decode(mut raw: &[u8], ids: DiscId, tracks: &mut [Track])
-> Result<(), ArVerifyError> {
	loop {
		let Some(header) = take::<HEADER_SIZE>(&mut raw) else { return Ok(()); };

		let count = usize::from(header[0]);
		let id1 = u32::from_le_bytes([header[1], header[2], header[3], header[4]]);
		let id2 = u32::from_le_bytes([header[5], header[6], header[7], header[8]]);
		let cddb = u32::from_le_bytes([header[9], header[10], header[11], header[12]]);
		if count != tracks.len() || id1 != ids.id1() || id2 != ids.id2() || cddb != ids.cddb() {
			return Err(ArVerifyError::Protocol);
		}

		for track in tracks.iter_mut() {
			let Some(entry) = take::<ENTRY_SIZE>(&mut raw) else { return Ok(()); };

			let confidence = entry[0];
			let crc = u32::from_le_bytes([entry[1], entry[2], entry[3], entry[4]]);
			let crc450 = u32::from_le_bytes([entry[5], entry[6], entry[7], entry[8]]);
			track.push_entry(DbEntry::new(crc, crc450, confidence));
		}
	}
}

/// # Take N Bytes.
///
/// Split a fixed-size chunk off the front of the slice, or return `None`
/// (leaving the slice alone) if it has fewer than `N` bytes left.
fn take<const N: usize>(raw: &mut &[u8]) -> Option<[u8; N]> {
	if raw.len() < N { None }
	else {
		let (head, rest) = raw.split_at(N);
		let head = <[u8; N]>::try_from(head).ok()?;
		*raw = rest;
		Some(head)
	}
}



#[cfg(test)]
mod tests {
	use super::*;
	use crate::DataTrackLen;
	use std::path::PathBuf;

	/// # Test Tracks.
	fn test_tracks(n: usize) -> Vec<Track> {
		(0..n)
			.map(|k| Track::new(PathBuf::from(format!("{:02}.flac", k + 1)), 588 * 75)
				.expect("Track failed."))
			.collect()
	}

	/// # Test Identifiers.
	fn test_ids(tracks: &[Track]) -> DiscId {
		let sectors: Vec<u32> = tracks.iter().map(Track::sectors).collect();
		DiscId::new(&sectors, 0, DataTrackLen::default())
	}

	/// # Encode One Response Block.
	fn push_block(out: &mut Vec<u8>, ids: DiscId, entries: &[(u8, u32, u32)]) {
		out.push(u8::try_from(entries.len()).expect("Too many entries."));
		out.extend_from_slice(&ids.id1().to_le_bytes());
		out.extend_from_slice(&ids.id2().to_le_bytes());
		out.extend_from_slice(&ids.cddb().to_le_bytes());
		for &(confidence, crc, crc450) in entries {
			out.push(confidence);
			out.extend_from_slice(&crc.to_le_bytes());
			out.extend_from_slice(&crc450.to_le_bytes());
		}
	}

	#[test]
	fn t_lookup_url() {
		let tracks = test_tracks(1);
		let ids = test_ids(&tracks);
		assert_eq!(
			lookup_url(ids, tracks.len()),
			"http://www.accuraterip.com/accuraterip/b/4/0/dBAR-001-0000004b-00000097-02000101.bin",
		);
	}

	#[test]
	fn t_decode_roundtrip() {
		let mut tracks = test_tracks(2);
		let ids = test_ids(&tracks);

		// Two submission blocks back to back.
		let mut raw = Vec::new();
		push_block(&mut raw, ids, &[(5, 0xAABB_CCDD, 0x1122_3344), (3, 0x0102_0304, 0x0A0B_0C0D)]);
		push_block(&mut raw, ids, &[(200, 0xDEAD_BEEF, 0xCAFE_D00D), (0, 0, 0)]);

		decode(&raw, ids, &mut tracks).expect("Decode failed.");
		assert_eq!(
			tracks[0].entries(),
			&[
				DbEntry::new(0xAABB_CCDD, 0x1122_3344, 5),
				DbEntry::new(0xDEAD_BEEF, 0xCAFE_D00D, 200),
			],
		);
		assert_eq!(
			tracks[1].entries(),
			&[
				DbEntry::new(0x0102_0304, 0x0A0B_0C0D, 3),
				DbEntry::new(0, 0, 0),
			],
		);
		assert_eq!(tracks[0].submissions(), 205);
	}

	#[test]
	fn t_decode_empty() {
		let mut tracks = test_tracks(3);
		let ids = test_ids(&tracks);

		decode(&[], ids, &mut tracks).expect("Decode failed.");
		assert!(tracks.iter().all(|t| t.entries().is_empty()));
	}

	#[test]
	fn t_decode_short() {
		let mut tracks = test_tracks(2);
		let ids = test_ids(&tracks);

		// Chop the second track's entry off mid-block; the first track's
		// entry should still land.
		let mut raw = Vec::new();
		push_block(&mut raw, ids, &[(5, 1, 2), (3, 4, 5)]);
		raw.truncate(HEADER_SIZE + ENTRY_SIZE + 4);

		decode(&raw, ids, &mut tracks).expect("Decode failed.");
		assert_eq!(tracks[0].entries(), &[DbEntry::new(1, 2, 5)]);
		assert!(tracks[1].entries().is_empty());
	}

	#[test]
	fn t_decode_mismatch() {
		let mut tracks = test_tracks(2);
		let ids = test_ids(&tracks);
		let other = DiscId::new(&[123, 456], 0, DataTrackLen::default());

		// Foreign identifiers poison the response; nothing can be kept.
		let mut raw = Vec::new();
		push_block(&mut raw, other, &[(5, 1, 2), (3, 4, 5)]);
		assert!(matches!(
			decode(&raw, ids, &mut tracks),
			Err(ArVerifyError::Protocol),
		));
		assert!(tracks.iter().all(|t| t.entries().is_empty()));

		// A bad track count is just as fatal.
		let mut raw = Vec::new();
		push_block(&mut raw, ids, &[(5, 1, 2)]);
		assert!(matches!(
			decode(&raw, ids, &mut tracks),
			Err(ArVerifyError::Protocol),
		));
	}

	#[test]
	fn t_absent() {
		assert!(absent(b"<html><body><h1>404 Not Found</h1></body></html>"));
		assert!(! absent(b""));
		assert!(! absent(b"\x02\x4b\x00\x00\x00\x97\x00\x00\x00\x01\x01\x00\x02"));
	}
}
