mod common;
mod images;
mod ingredients;
