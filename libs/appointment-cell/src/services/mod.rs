pub mod lookup;

pub use lookup::AppointmentService;
