/*!
# ArVerify
*/

#![forbid(unsafe_code)]

#![deny(
	clippy::allow_attributes_without_reason,
	clippy::correctness,
	unreachable_pub,
)]

#![warn(
	clippy::complexity,
	clippy::nursery,
	clippy::pedantic,
	clippy::perf,
	clippy::style,

	clippy::allow_attributes,
	clippy::clone_on_ref_ptr,
	clippy::create_dir,
	clippy::filetype_is_file,
	clippy::format_push_string,
	clippy::get_unwrap,
	clippy::impl_trait_in_params,
	clippy::lossy_float_literal,
	clippy::missing_assert_message,
	clippy::missing_docs_in_private_items,
	clippy::needless_raw_strings,
	clippy::panic_in_result_fn,
	clippy::pub_without_shorthand,
	clippy::rest_pat_in_fully_bound_structs,
	clippy::semicolon_inside_block,
	clippy::str_to_string,
	clippy::string_to_string,
	clippy::todo,
	clippy::undocumented_unsafe_blocks,
	clippy::unneeded_field_pattern,
	clippy::unseparated_literal_suffix,
	clippy::unwrap_in_result,

	macro_use_extern_crate,
	missing_copy_implementations,
	missing_docs,
	non_ascii_idents,
	trivial_casts,
	trivial_numeric_casts,
	unused_crate_dependencies,
	unused_extern_crates,
	unused_import_braces,
)]



mod cli;

use arverify_core::{
	Album,
	ArVerifyError,
	Dependencies,
	KillSwitch,
	VerifyOptions,
};
use fyi_msg::{
	Msg,
	Progless,
};
use std::{
	process::ExitCode,
	sync::{
		Arc,
		atomic::{
			AtomicBool,
			Ordering::Release,
		},
		OnceLock,
	},
};
use utc2k::FmtUtc2k;



/// # Kill Flag.
///
/// The CTRL-C intercept needs somewhere `'static` to write; the core's
/// `KillSwitch` wraps a borrow of this.
static KILLED: OnceLock<Arc<AtomicBool>> = OnceLock::new();



/// # Main.
///
/// This lets us bubble up startup errors so they can be pretty-printed.
fn main() -> ExitCode {
	match main__() {
		Ok(code) => code,
		Err(e @ (ArVerifyError::PrintHelp | ArVerifyError::PrintVersion)) => {
			println!("{e}");
			ExitCode::SUCCESS
		},
		Err(e @ ArVerifyError::Killed) => {
			Msg::from(e).eprint();
			ExitCode::from(1)
		},
		Err(e) => {
			Msg::from(e).eprint();
			ExitCode::from(2)
		},
	}
}

#[inline]
/// # Actual Main.
///
/// This does all the stuff.
fn main__() -> Result<ExitCode, ArVerifyError> {
	let (paths, opts) = cli::parse()?;

	// Helpers have to exist before any real work is worth starting.
	let deps = Dependencies::find()?;

	// Intercept CTRL-C so in-flight helper processes can be cleaned up
	// rather than orphaned.
	let flag = KILLED.get_or_init(|| Arc::new(AtomicBool::new(false)));
	let killed = KillSwitch::from(flag);
	let _res = ctrlc::set_handler({
		let flag = Arc::clone(flag);
		move || flag.store(true, Release)
	});

	if opts.verbose() { log_header(&opts); }

	let mut album = Album::new(paths, &deps, &opts)?;
	if opts.verbose() { eprint!("{album}"); }
	else { println!("Disc ID: {}", album.ids()); }

	let progress = Progless::default();
	let bad = album.verify(&deps, &opts, &progress, killed)?;

	if killed.killed() { Err(ArVerifyError::Killed) }
	else { Ok(ExitCode::from(u8::try_from(bad).unwrap_or(u8::MAX))) }
}

/// # Log Header.
///
/// Print a few basic setup details. Only applies when -v/--verbose is set.
fn log_header(opts: &VerifyOptions) {
	use std::io::Write;

	let writer = std::io::stderr();
	let mut handle = writer.lock();

	let _res = writeln!(
		&mut handle,
		concat!("#####
## ArVerify v", env!("CARGO_PKG_VERSION"), "
## Date: {}"),
		FmtUtc2k::now(),
	);
	if opts.additional_sectors() != 0 {
		let _res = writeln!(
			&mut handle,
			"## Additional pregap sectors: {}",
			opts.additional_sectors(),
		);
	}
	if opts.data_track().sectors() != 0 {
		let _res = writeln!(
			&mut handle,
			"## Data track length: {} sectors",
			opts.data_track().sectors(),
		);
	}
	let _res = writeln!(&mut handle, "#####");
	let _res = handle.flush();
}
