use core::convert::Infallible;

use embedded_hal::digital::v2::InputPin;

/// Card detect line for boards that do not wire one, always reads low
#[derive(Copy, Clone, Debug, Default)]
pub struct DummyInputPin;

impl InputPin for DummyInputPin {
    type Error = Infallible;

    fn is_high(&self) -> Result<bool, Self::Error> {
        Ok(false)
    }

    fn is_low(&self) -> Result<bool, Self::Error> {
        Ok(true)
    }
}
