pub mod animals;
pub mod unsplash;

pub use animals::{AnimalRecord, AnimalsClient, AnimalsHttpClient};
pub use unsplash::{PhotoClient, UnsplashHttpClient};
