//! Composable request guards run before every domain operation.
//!
//! A [`Guard`] enforces one precondition and hands the operation a permit: the
//! [`RateLimiter`] delays until the minimum inter-request interval has elapsed, and the
//! [`TokenManager`] refreshes a stale token and yields the `Authorization` header to send.
//! [`Layered`] chains two guards outermost first, and [`guarded`] runs an operation behind
//! any guard. Both platform clients use `Layered<RateLimiter, TokenManager<_>>`, so the rate
//! slot is taken before a refresh can happen and a failed refresh aborts the call.

pub mod credential;
pub mod rate;

pub use credential::*;
pub use rate::*;

// self
use crate::_prelude::*;

/// Boxed future returned by [`Guard::admit`].
pub type GuardFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + 'a + Send>>;

/// Precondition enforced immediately before a guarded operation runs.
pub trait Guard
where
	Self: Send + Sync,
{
	/// Value handed to the operation once the precondition holds.
	type Permit: Send;

	/// Waits until the precondition holds, or fails without running the operation.
	fn admit(&self) -> GuardFuture<'_, Self::Permit>;
}

/// Two guards applied in order: `outer` first, then `inner`.
#[derive(Debug)]
pub struct Layered<O, I> {
	/// Guard admitted first.
	pub outer: O,
	/// Guard admitted once the outer guard lets the call through.
	pub inner: I,
}
impl<O, I> Layered<O, I> {
	/// Composes `outer` around `inner`.
	pub fn new(outer: O, inner: I) -> Self {
		Self { outer, inner }
	}
}
impl<O, I> Guard for Layered<O, I>
where
	O: Guard,
	I: Guard,
{
	type Permit = (O::Permit, I::Permit);

	fn admit(&self) -> GuardFuture<'_, Self::Permit> {
		Box::pin(async move {
			let outer = self.outer.admit().await?;
			let inner = self.inner.admit().await?;

			Ok((outer, inner))
		})
	}
}

/// Runs `op` once `guard` admits the call, passing along the guard's permit.
///
/// When admission fails the error is returned and `op` never runs.
pub async fn guarded<G, F, Fut, T>(guard: &G, op: F) -> Result<T>
where
	G: ?Sized + Guard,
	F: FnOnce(G::Permit) -> Fut,
	Fut: Future<Output = Result<T>>,
{
	let permit = guard.admit().await?;

	op(permit).await
}
