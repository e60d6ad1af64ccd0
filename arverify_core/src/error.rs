/*!
# ArVerify: Errors
*/

use fyi_msg::Msg;
use std::{
	error::Error,
	fmt,
};



#[cfg(feature = "bin")]
/// # Help Text.
const HELP: &str = concat!(r"
    ______
  /        \
 |  ( (  ) )|   ArVerify v", env!("CARGO_PKG_VERSION"), r"
 |  ( (  ) )|   Whole-album AccurateRip verification
  \ ______ /    for lossless CD rips.

USAGE:
    arverify [OPTIONS] <FILE(s)>

OPTIONS:
    -a, --additional-sectors <NUM>
                      Additional pregap sectors beyond the standard 150.
                      [default: 0]
    -d, --data-track-length <SECTORS|mm:ss.ff>
                      Length of the disc's trailing data track, as a raw
                      sector count or an mm:ss.ff timecode (75 frames to
                      the second). [default: none]
    -h, --help        Print help information to STDOUT and exit.
    -v, --verbose     Print the lookup URL, calculated CRC450s, and the raw
                      database entries along the way.
    -V, --version     Print version information to STDOUT and exit.

EXIT STATUS:
    The number of tracks that definitely did not match the database, or
    1 if interrupted, or 2 on any other failure.

TRAILING:
    <FILE(s)>         One or more lossless rips, in track order.
");



#[derive(Debug, Clone, Eq, PartialEq)]
/// # Errors.
pub enum ArVerifyError {
	/// # Invalid data track length.
	DataTrackLen,

	/// # Missing required dependency.
	Dependency(&'static str),

	/// # User Abort.
	Killed,

	/// # AccurateRip is unreachable.
	Network,

	/// # No input files.
	NoTracks,

	/// # Sample count isn't sector-aligned.
	NotFromCd(String, u64),

	/// # Numbers can't be converted to the necessary types.
	Overflow,

	/// # Response/disc mismatch.
	Protocol,

	/// # Unable to count samples.
	SampleCount(String),

	/// # Scratch file.
	Scratch,

	/// # Unable to spawn a helper program.
	Spawn(&'static str),

	/// # A helper program failed.
	Subprocess(&'static str, i32),

	#[cfg(feature = "bin")]
	/// # CLI Parsing failure.
	CliParse(&'static str),

	#[cfg(feature = "bin")]
	/// # Not a file.
	InvalidPath(String),

	#[cfg(feature = "bin")]
	/// # Print Help (Not an Error).
	PrintHelp,

	#[cfg(feature = "bin")]
	/// # Print Version (Not an Error).
	PrintVersion,
}

impl Error for ArVerifyError {}

impl From<ArVerifyError> for Msg {
	#[inline]
	fn from(src: ArVerifyError) -> Self { Self::error(src.to_string()) }
}

impl fmt::Display for ArVerifyError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::DataTrackLen => f.write_str("Invalid data track length."),
			Self::Dependency(s) => write!(f, "Missing required dependency: {s}."),
			Self::Killed => f.write_str("User abort."),
			Self::Network => f.write_str("Unable to reach the AccurateRip database."),
			Self::NoTracks => f.write_str("At least one audio file is required."),
			Self::NotFromCd(p, n) => write!(f, "{p} is not from a CD ({n} samples)."),
			Self::Overflow => f.write_str("The numbers are too big for this system architecture."),
			Self::Protocol => f.write_str("The response track count or disc IDs don't match."),
			Self::SampleCount(p) => write!(f, "Unable to count the samples in {p}."),
			Self::Scratch => f.write_str("Unable to create a scratch file."),
			Self::Spawn(s) => write!(f, "Unable to execute {s}."),
			Self::Subprocess(s, code) => write!(f, "{s} had an error (returned {code})."),

			#[cfg(feature = "bin")]
			Self::CliParse(s) => write!(f, "Unable to parse {s}."),

			#[cfg(feature = "bin")]
			Self::InvalidPath(s) => write!(f, "{s} is not a file."),

			#[cfg(feature = "bin")]
			Self::PrintHelp => f.write_str(HELP),

			#[cfg(feature = "bin")]
			Self::PrintVersion => f.write_str(concat!("ArVerify v", env!("CARGO_PKG_VERSION"))),
		}
	}
}
