//! Storage adapters.

mod in_memory_ticket_store;

pub use in_memory_ticket_store::InMemoryTicketStore;
