//! Comic-style speech and thought bubbles around rectangular content.
//!
//! A bubble wraps one content region. Its description ([`BubbleSpec`]) lives
//! in a single attribute on that region; the engine turns it into a body
//! outline and tails, draws them into a three-layer [`Scene`], lets the user
//! drag tail tips and midpoints, and writes every change back.
//!
//! ```
//! use comical::{Comical, ContentHost, MemoryHost, Rect, Style};
//!
//! let mut host = MemoryHost::new();
//! let region = host.add_region("caption-1", Some(Rect::new(40.0, 40.0, 120.0, 30.0)));
//!
//! let mut comical = Comical::new(host);
//! comical.add_bubble(&region, Style::Speech).unwrap();
//! comical.start_editing().unwrap();
//!
//! let svg = comical.stop_editing().unwrap();
//! assert!(svg.starts_with("<svg"));
//! assert!(comical.host().bubble_attribute(&region).unwrap().contains("`speech`"));
//! ```

pub mod bubble;
pub mod comical;
pub mod errors;
pub mod handle;
pub mod host;
mod log;
pub mod render;
pub mod spec;
pub mod tail;
pub mod types;

pub use bubble::{Bubble, LayoutStatus};
pub use comical::Comical;
pub use errors::{ComicalError, Result};
pub use handle::{DragOutcome, DragState, HandleKind};
pub use host::{ContentHost, MemoryHost, RegionId, quietly};
pub use render::{RenderOptions, Scene, export_svg};
pub use spec::{BubbleSpec, BubbleSpecPattern, SPEC_VERSION, Style, TailSpec};
pub use tail::{Tail, TailContext, TailShape};
pub use types::Rect;
