/*!
# ArVerify: Verification Options
*/

use crate::DataTrackLen;



#[derive(Debug, Clone, Copy, Default)]
/// # Verification Options.
///
/// This struct holds the disc-layout hints and verbosity for a verification
/// run.
///
/// Options are set using builder-style methods, like:
///
/// ```
/// use arverify_core::VerifyOptions;
///
/// let opts = VerifyOptions::default()
///     .with_additional_sectors(25)
///     .with_verbose(true);
///
/// assert_eq!(opts.additional_sectors(), 25);
/// assert!(opts.verbose());
/// ```
pub struct VerifyOptions {
	additional_sectors: u32,
	data_track: DataTrackLen,
	verbose: bool,
}

/// ## Setters.
impl VerifyOptions {
	#[must_use]
	/// # Additional Pregap Sectors.
	///
	/// Pregap sectors beyond the standard 150 already embedded by
	/// convention. Most discs have none.
	///
	/// The default is `0`.
	pub const fn with_additional_sectors(self, v: u32) -> Self {
		Self {
			additional_sectors: v,
			..self
		}
	}

	#[must_use]
	/// # Data Track Length.
	///
	/// The length of a trailing data track, if any. This shifts the disc
	/// identifiers even though the data track itself is never verified.
	///
	/// The default is none.
	pub const fn with_data_track(self, v: DataTrackLen) -> Self {
		Self {
			data_track: v,
			..self
		}
	}

	#[must_use]
	/// # Verbose Output.
	///
	/// When `true`, print the lookup URL, calculated CRC450s, and the raw
	/// database entries along with the usual summaries.
	///
	/// The default is `false`.
	pub const fn with_verbose(self, v: bool) -> Self {
		Self {
			verbose: v,
			..self
		}
	}
}

/// ## Getters.
impl VerifyOptions {
	#[must_use]
	/// # Additional Pregap Sectors.
	pub const fn additional_sectors(&self) -> u32 { self.additional_sectors }

	#[must_use]
	/// # Data Track Length.
	pub const fn data_track(&self) -> DataTrackLen { self.data_track }

	#[must_use]
	/// # Verbose?
	pub const fn verbose(&self) -> bool { self.verbose }
}
