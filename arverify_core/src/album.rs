/*!
# ArVerify: Album
*/

use crate::{
	ArVerifyError,
	chk_track,
	Dependencies,
	DiscId,
	KillSwitch,
	lookup,
	pipeline,
	probe,
	report,
	Track,
	VerifyOptions,
};
use fyi_msg::Progless;
use std::{
	fmt,
	path::PathBuf,
};



#[derive(Debug)]
/// # Album.
///
/// The full set of rips under verification, in disc order, along with the
/// identifiers derived from their layout.
pub struct Album {
	tracks: Vec<Track>,
	ids: DiscId,
}

impl fmt::Display for Album {
	/// # Summarize the Layout.
	///
	/// This prints the disc identifiers and a little table of the track
	/// boundaries that produced them.
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		/// # Divider.
		const DIVIDER: &str = "----------------------------------------\n";

		writeln!(f, "Disc ID: {}\n", self.ids)?;
		writeln!(f, "##  SECTORS     SAMPLES  PATH")?;
		f.write_str(DIVIDER)?;
		for (k, track) in (1..).zip(self.tracks.iter()) {
			writeln!(
				f,
				"{k:02}  {:>7}  {:>10}  {}",
				track.sectors(),
				track.samples(),
				track.path().display(),
			)?;
		}
		f.write_str(DIVIDER)
	}
}

impl Album {
	/// # New.
	///
	/// Probe each path for its sample count, sanity-check the sector
	/// alignment, and derive the disc identifiers from the whole layout.
	///
	/// ## Errors
	///
	/// This will return an error if no paths were given, a sample count
	/// cannot be obtained, or a file turns out not to be CD-sized.
	pub fn new(paths: Vec<PathBuf>, deps: &Dependencies, opts: &VerifyOptions)
	-> Result<Self, ArVerifyError> {
		if paths.is_empty() { return Err(ArVerifyError::NoTracks); }

		let mut tracks = Vec::with_capacity(paths.len());
		for path in paths {
			let samples = probe::num_samples(deps, &path)?;
			tracks.push(Track::new(path, samples)?);
		}

		let sectors: Vec<u32> = tracks.iter().map(Track::sectors).collect();
		let ids = DiscId::new(&sectors, opts.additional_sectors(), opts.data_track());

		Ok(Self { tracks, ids })
	}

	#[must_use]
	/// # Disc Identifiers.
	pub const fn ids(&self) -> DiscId { self.ids }

	#[must_use]
	/// # Tracks.
	pub fn tracks(&self) -> &[Track] { &self.tracks }

	/// # Verify!
	///
	/// Fetch the database entries, run the external checksum pipeline,
	/// match everything up, and print the report. Returns the number of
	/// tracks that definitely did not match — the process exit status.
	///
	/// ## Errors
	///
	/// This will return an error if the lookup or pipeline fails, or the
	/// run is interrupted.
	pub fn verify(
		&mut self,
		deps: &Dependencies,
		opts: &VerifyOptions,
		progress: &Progless,
		killed: KillSwitch,
	) -> Result<usize, ArVerifyError> {
		lookup::fetch(self.ids, &mut self.tracks, opts.verbose())?;
		if killed.killed() { return Err(ArVerifyError::Killed); }

		pipeline::scan(deps, &mut self.tracks, progress, killed)?;
		if killed.killed() { return Err(ArVerifyError::Killed); }

		for track in &mut self.tracks { chk_track(track); }
		Ok(report::summarize(&self.tracks, opts.verbose()))
	}
}
