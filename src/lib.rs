pub mod app;
pub mod audio;
pub mod config;
pub mod creator;
pub mod game;
pub mod model;
pub mod scene;
pub mod submit;
