//! Pure text transforms: markup stripping, title resolution, and the
//! bounded-overlap segmenter.  Nothing in this module performs I/O.

pub mod normalize;
pub mod segment;
pub mod title;

pub use normalize::clean_markup;
pub use segment::segment;
pub use title::resolve_title;
