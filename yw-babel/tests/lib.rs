// This file is required to make `cargo test` discover tests in subdirectories.

#[cfg(test)]
mod common;

#[cfg(test)]
mod documents;

#[cfg(test)]
mod model;

#[cfg(test)]
mod project_file;

#[cfg(test)]
mod templates;
