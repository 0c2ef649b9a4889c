//! The two widgets. Each owns its state outright; nothing is shared between them.

mod counter;
mod gallery;

pub use counter::{Counter, CounterMsg};
pub use gallery::{FormInputs, Gallery, GalleryMsg, PhotoEntry, Submission, UrlPolicy};
