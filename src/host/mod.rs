//! Host Module - The surfaces a gate attaches to
//!
//! The gating core never talks to a UI toolkit directly. It sees a
//! [`HostSurface`]: something that accepts capture/bubble listeners and takes
//! synthetic events back through [`HostSurface::dispatch`].
//!
//! - **surface** - `HostSurface`, `HostLocator`, `HostRegistry`
//! - **listeners** - Ordered capture/bubble listener registry
//! - **headless** - `SurfaceHost`, `HeadlessPresenter`, `NoticeBoard` for
//!   embedding without a screen (and for tests)

mod headless;
mod listeners;
mod surface;

pub use headless::*;
pub use listeners::*;
pub use surface::*;
