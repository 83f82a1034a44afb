pub mod html;
pub mod issues;
pub mod paths;
pub mod sets;
pub mod surf_logging;
pub mod urls;
