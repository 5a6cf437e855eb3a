// handlers/mod.rs - Handler tiers
//
// Public (no auth) → Protected (shared-secret token in Authorization header)
pub mod public;    // /, /health, /authent, /batch and the 404 fallback
pub mod protected; // /quests/*
