//! `vitrine` - Animation state machines for a portfolio landing page
//!
//! The page's two timer-driven effects, a typewriter cycling through role
//! titles and a cursor engine that lights overlays and spawns
//! self-expiring click effects, modelled as deterministic machines over
//! page time. Hosts plug in through small traits ([`typewriter::TextSink`],
//! [`cursor::EffectSurface`]); drivers advance the machines in virtual
//! time ([`driver::Simulation`]) or on tokio time ([`driver::runtime`]).
//!
//! Alongside the core sit the page's simpler collaborators: contact form
//! validation ([`form`]) and header/active-section scroll tracking
//! ([`scroll`]).

pub mod cli;
pub mod clock;
pub mod config;
pub mod cursor;
pub mod driver;
pub mod error;
pub mod form;
pub mod observability;
pub mod scroll;
pub mod typewriter;
