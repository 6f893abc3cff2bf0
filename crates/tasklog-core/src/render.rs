use crate::error::Result;
use crate::models::SleepSeries;

/// The last stage of the pipeline: draws a [`SleepSeries`] somewhere.
///
/// Implemented by the image and terminal charts in `tasklog-ui`; tests plug
/// in a recorder instead.
pub trait ChartRenderer {
    fn render(&mut self, series: &SleepSeries) -> Result<()>;
}

impl<R: ChartRenderer + ?Sized> ChartRenderer for Box<R> {
    fn render(&mut self, series: &SleepSeries) -> Result<()> {
        (**self).render(series)
    }
}
