//! Database models.

pub mod menu;
pub mod menu_link;

pub use menu::{CreateMenu, Menu};
pub use menu_link::{CreateMenuLink, MenuLink};
