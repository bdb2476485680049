// Wizard: the four-screen flow (landing → role → skills → results) driven per session.
// All evaluation service calls go through evaluation_client.

pub mod completion;
pub mod controller;
pub mod handlers;
pub mod session;
pub mod store;
