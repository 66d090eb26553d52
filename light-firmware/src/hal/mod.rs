// Hardware Abstraction Layer (HAL) Module
//
// Implementierungen der light-core Traits:
// LEDC-Ausgänge und GPIO-Taster des ESP32-C6.

pub mod button;
pub mod pwm_writer;

pub use button::PushButton;
pub use pwm_writer::LedcPwmWriter;
