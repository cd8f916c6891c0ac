//! Widget implementations
//!
//! Passive widgets (tables, animations, loading screens) draw once when
//! created. Active widgets (menus, text boxes, the map viewport) are attached
//! to the [`Ui`](crate::core::Ui) focus ring and react to keys while focused.

pub mod animation;
pub mod chrome;
pub mod loading;
pub mod map_view;
pub mod menu;
pub mod table;
pub mod text_box;

pub use animation::{Animation, DEFAULT_FRAME_DELAY};
pub use loading::{FastLoading, LoadingAnimation};
pub use map_view::{MapHandle, MapInfo, MapOptions, MapView};
pub use menu::{Menu, MenuHandle, MenuLayout, MenuOption};
pub use table::{RowAlign, Table, TableOptions, TableStyle};
pub use text_box::{TextBox, TextBoxHandle, TextBoxLayout, ValueKind};
