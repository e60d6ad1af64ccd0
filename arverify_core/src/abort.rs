/*!
# ArVerify: Kill Switch
*/

use std::sync::{
	Arc,
	atomic::{
		AtomicBool,
		Ordering::Acquire,
	},
};



#[derive(Debug, Clone, Copy)]
/// # Kill Switch.
///
/// This is a short-circuit for the long-running stretches — the network
/// lookup and the external checksum pipeline — shared between the main
/// program's CTRL-C intercept and the verification flow.
///
/// The intercept sets the value; the flow checks it between phases so any
/// in-flight helper processes can be reaped before dying.
pub struct KillSwitch(&'static Arc<AtomicBool>);

impl From<&'static Arc<AtomicBool>> for KillSwitch {
	#[inline]
	fn from(src: &'static Arc<AtomicBool>) -> Self { Self(src) }
}

impl KillSwitch {
	#[must_use]
	/// # Dead?
	pub fn killed(&self) -> bool { self.0.load(Acquire) }
}
