mod listing;

pub use listing::FolderListing;
