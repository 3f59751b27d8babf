//! Shared type definitions for the `AuraPnL` blob battle simulation.
//!
//! This crate is the single source of truth for the data model shared by
//! the world initializer, the pursuit engine, and the renderer. Types
//! defined here flow downstream to `TypeScript` via `ts-rs` so the
//! renderer reads snapshots with the same field names.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe index wrappers for agents, tokens, and rewards
//! - [`geometry`] -- [`Vec2`], [`Canvas`], and the pure vector math helpers
//! - [`enums`] -- [`AgentRole`]
//! - [`structs`] -- Agents, tokens, reward events, and per-frame views
//! - [`snapshot`] -- The immutable [`Snapshot`] for one frame

pub mod enums;
pub mod geometry;
pub mod ids;
pub mod snapshot;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::AgentRole;
pub use geometry::{Canvas, Vec2, direction, distance, normalize};
pub use ids::{AgentId, RewardEventId, TokenId};
pub use snapshot::Snapshot;
pub use structs::{Agent, AgentFrame, RewardEvent, Rgb, Token, TokenFrame};

#[cfg(test)]
mod tests {
    //! `TypeScript` binding generation for the renderer.

    #[test]
    fn export_bindings() {
        // ts-rs generates TypeScript bindings when types with
        // #[ts(export)] are used. The files are written to the
        // `bindings/` directory relative to the crate root.
        use ts_rs::TS;

        // IDs
        let _ = crate::ids::AgentId::export_all();
        let _ = crate::ids::TokenId::export_all();
        let _ = crate::ids::RewardEventId::export_all();

        // Geometry
        let _ = crate::geometry::Vec2::export_all();
        let _ = crate::geometry::Canvas::export_all();

        // Enums
        let _ = crate::enums::AgentRole::export_all();

        // Structs
        let _ = crate::structs::Rgb::export_all();
        let _ = crate::structs::Agent::export_all();
        let _ = crate::structs::Token::export_all();
        let _ = crate::structs::RewardEvent::export_all();
        let _ = crate::structs::AgentFrame::export_all();
        let _ = crate::structs::TokenFrame::export_all();
        let _ = crate::snapshot::Snapshot::export_all();
    }
}
