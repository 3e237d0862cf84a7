use std::io;

/// Sequential consumer of the magnetization values a temperature run
/// produces.
///
/// For each temperature a sink sees `begin_temperature`, then one `record`
/// per sample in order, then `end_temperature`.
pub trait MagnetizationSink {
    fn begin_temperature(&mut self, _temperature: f64) -> io::Result<()> {
        Ok(())
    }

    fn record(&mut self, magnetization: i64) -> io::Result<()>;

    fn end_temperature(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl MagnetizationSink for Vec<i64> {
    fn record(&mut self, magnetization: i64) -> io::Result<()> {
        self.push(magnetization);
        Ok(())
    }
}

/// Magnetization time series of one temperature, one value per sample.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MagnetizationSeries {
    pub temperature: f64,
    pub values: Vec<i64>,
}

impl MagnetizationSeries {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Feed the stored series through another sink.
    pub fn replay_into<K: MagnetizationSink + ?Sized>(&self, sink: &mut K) -> io::Result<()> {
        sink.begin_temperature(self.temperature)?;
        for &m in &self.values {
            sink.record(m)?;
        }
        sink.end_temperature()
    }
}

impl MagnetizationSink for MagnetizationSeries {
    fn begin_temperature(&mut self, temperature: f64) -> io::Result<()> {
        self.temperature = temperature;
        self.values.clear();
        Ok(())
    }

    fn record(&mut self, magnetization: i64) -> io::Result<()> {
        self.values.push(magnetization);
        Ok(())
    }
}
