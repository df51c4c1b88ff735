/// Engine time in seconds.
#[derive(Copy, Clone, Debug, PartialEq, PartialOrd)]
pub struct Time(pub f64);

impl Time {
    pub const ZERO: Time = Time(0.0);

    pub fn seconds(self) -> f64 {
        self.0
    }
}
