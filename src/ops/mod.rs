pub mod close_timer;
pub mod listing;
pub mod region;
pub mod typeahead;
