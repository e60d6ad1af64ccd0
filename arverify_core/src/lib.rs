/*!
# ArVerify: Library
*/

#![deny(unsafe_code)]

#![warn(
	clippy::filetype_is_file,
	clippy::needless_borrow,
	clippy::nursery,
	clippy::pedantic,
	clippy::perf,
	clippy::suboptimal_flops,
	clippy::unneeded_field_pattern,
	macro_use_extern_crate,
	missing_copy_implementations,
	missing_debug_implementations,
	missing_docs,
	non_ascii_idents,
	trivial_casts,
	trivial_numeric_casts,
	unreachable_pub,
	unused_crate_dependencies,
	unused_extern_crates,
	unused_import_braces,
)]

#![allow(
	clippy::doc_markdown,
	clippy::module_name_repetitions,
	clippy::redundant_pub_crate,
)]

mod abort;
mod album;
mod chk;
mod deps;
mod disc;
mod error;
mod lookup;
mod opts;
mod pipeline;
mod probe;
mod report;
mod track;

pub use abort::KillSwitch;
pub use album::Album;
pub use deps::Dependencies;
pub use disc::{
	DataTrackLen,
	DiscId,
};
pub use error::ArVerifyError;
pub use opts::VerifyOptions;
pub use track::{
	DbEntry,
	Track,
};
pub(crate) use chk::chk_track;
pub(crate) use track::ComputedCrcs;



/// # Static Hasher.
pub(crate) const AHASHER: ahash::RandomState = ahash::RandomState::with_seeds(29, 67, 71, 113);

/// # Samples Per Sector.
///
/// One sector of CD audio holds 588 stereo samples at 44.1kHz. Tracks whose
/// sample counts don't divide evenly by this can't have come from a CD.
pub const SAMPLES_PER_SECTOR: u64 = 588;

/// # Samples Per Second.
pub const SAMPLES_PER_SECOND: u64 = 44_100;

/// # Sectors Per Second.
///
/// CD positions are addressed at 75 frames to the second, independent of the
/// 44.1kHz sample clock.
pub const SECTORS_PER_SECOND: u64 = 75;

/// # Data Track Lead-Out Gap (Sectors).
///
/// Mixed-mode discs separate the trailing data session from the audio by a
/// fixed gap that factors into the disc identifiers.
pub(crate) const LEADOUT_GAP_SECTORS: u64 = 11_400;
