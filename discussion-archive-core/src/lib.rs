#![doc = "discussion-archive-core: core logic library for discussion-archive."]

//! This crate holds the data model and the fetch → write → render pipeline that
//! mirrors a repository's discussions into a static Markdown archive.
//! The CLI crate only parses arguments, loads configuration and calls
//! [`synchronise::synchronise`].
//!
//! # Usage
//! Build an [`config::ArchiveConfig`], wrap its download section in a
//! [`download::GraphQlDownloader`] and pass both to the pipeline.

pub mod archive;
pub mod config;
pub mod contract;
pub mod download;
pub mod error;
pub mod render;
pub mod sanitize;
pub mod synchronise;
