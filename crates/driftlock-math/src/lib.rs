//! Integer fixed-point primitives for the rate recovery pipeline.
//!
//! Everything here is branch-light, allocation-free and safe to call from an
//! interrupt-like context. Intermediates are widened to `u128` so no shift or
//! product can overflow; results truncate to `u32` the way the hardware divide
//! they replace did.

mod div;
mod ema;

pub use div::{div_q, div_q_headroom, div_q_wide, headroom};
pub use ema::{ema_q31, q31, Q31_ONE};
