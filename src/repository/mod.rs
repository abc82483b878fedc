mod products;

pub use products::ProductRepository;
