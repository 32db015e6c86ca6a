//! Static site output: HTML pages, sitemap, redirect rules and assets.

pub mod assets;
pub mod error;
pub mod html;
pub mod links;
pub mod site;
pub mod template;

pub use assets::{Assets, copy_static_assets};
pub use error::RenderError;
pub use html::BuiltinTemplates;
pub use links::{LinkTarget, canonical, path_escape};
pub use site::{RenderSummary, SiteContext, htaccess, render_site, sitemap};
pub use template::{PAGES, Page, Template, TemplateData, TemplateEngine};
