pub mod event_config;
pub mod mail;
pub mod rsvp;
pub mod rsvp_name;

pub use event_config::Entity as EventConfig;
pub use mail::Entity as Mail;
pub use rsvp::Entity as Rsvp;
pub use rsvp::RsvpStatus;
pub use rsvp_name::Entity as RsvpName;
