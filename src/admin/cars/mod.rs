pub mod handlers;
pub mod models;
pub mod repository;
pub mod templates;

// Re-export commonly used items
pub use handlers::{delete_car, store_car, update_car, CAR_CREATE, CAR_INDEX};
pub use models::{Car, CarFields, CarForm, CarListing};
pub use repository::CarRepository;
pub use templates::{car_create_handler, car_edit_handler, car_list_handler};
