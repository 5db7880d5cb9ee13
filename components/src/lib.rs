//! # propwire-components
//!
//! Components generated at build time from the docgen descriptions in
//! `schemas/`. Each component module exposes `<Name>` and `<Name>State`;
//! [`register_all`] makes every state type restorable from its wrapped
//! snapshot and component-type tag.

include!(concat!(env!("OUT_DIR"), "/components.rs"));
