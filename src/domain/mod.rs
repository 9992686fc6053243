// Domain layer module exports
// Following Hexagonal Architecture and DDD principles
// Entities and repository ports; adapters live in infrastructure

pub mod repositories;
pub mod user;
