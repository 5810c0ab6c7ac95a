mod dates;
mod document;
mod grouping;
mod record;
mod report;
mod run;
mod store;

pub use run::run;
