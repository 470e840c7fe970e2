//! Utility modules for data structures and display formatting.
//!
//! Provides:
//! - [`RingBuffer`] - Fixed-capacity circular buffer with O(1) push
//! - [`format`] - Date formatting for `ls -l`, `date` and `top`

pub mod format;
mod ring_buffer;

pub use ring_buffer::RingBuffer;
