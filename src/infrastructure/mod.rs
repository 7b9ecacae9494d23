//! Adapters implementing the domain ports: in-memory doubles plus the real
//! Monobank, Google Sheets, and Telegram clients.

pub mod google_sheets;
pub mod in_memory;
pub mod monobank;
pub mod telegram;
