use crate::{config::PaletteConfig, factory, Baseline, Result, Wave, WaveViewError};

/// Ordered collection of waves. Index 0 is painted first (back), the last
/// entry is painted on top.
///
/// The stack is only mutated through explicit insertions; waves are never
/// reordered or removed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WaveLayerStack {
    waves: Vec<Wave>,
    generated: usize,
}

impl WaveLayerStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.waves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waves.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Wave> {
        self.waves.get(index)
    }

    /// Waves in draw order.
    pub fn waves(&self) -> &[Wave] {
        &self.waves
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Wave> {
        self.waves.iter()
    }

    /// Appends a wave on top of the stack.
    pub fn push(&mut self, wave: Wave) {
        self.waves.push(wave);
    }

    /// Inserts `waves` so the first of them lands at `index`. Entries at and
    /// after `index` move back by `waves.len()`.
    pub fn insert_all(&mut self, index: usize, waves: Vec<Wave>) -> Result<()> {
        self.check_insert_index(index)?;
        if waves.is_empty() {
            return Ok(());
        }

        let count = waves.len();
        self.waves.splice(index..index, waves);
        tracing::debug!(index, count, len = self.waves.len(), "inserted waves");
        Ok(())
    }

    /// Generates `count` default waves and inserts them at `base_layer_index`.
    ///
    /// Fails without touching the stack when the index is past the end.
    pub fn add_default_waves(
        &mut self,
        count: usize,
        base_layer_index: usize,
        palette: &PaletteConfig,
    ) -> Result<()> {
        self.check_insert_index(base_layer_index)?;
        if count == 0 {
            return Ok(());
        }

        let waves = factory::default_waves(self.generated, count, palette)?;
        self.insert_all(base_layer_index, waves)?;
        self.generated += count;
        Ok(())
    }

    /// Smallest surface height whose bounds contain every wave's band.
    pub fn preferred_height(&self) -> f64 {
        self.waves
            .iter()
            .map(|wave| {
                let anchor = match wave.baseline() {
                    Baseline::FromTop(y) | Baseline::FromBottom(y) => y,
                };
                anchor + wave.amplitude()
            })
            .fold(0.0, f64::max)
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> Result<&mut Wave> {
        let len = self.waves.len();
        self.waves
            .get_mut(index)
            .ok_or(WaveViewError::IndexOutOfRange { index, len })
    }

    /// Advances every wave's phase by its own velocity times `dt`.
    pub(crate) fn advance(&mut self, dt: f64) {
        for wave in &mut self.waves {
            wave.advance(dt);
        }
    }

    fn check_insert_index(&self, index: usize) -> Result<()> {
        if index > self.waves.len() {
            return Err(WaveViewError::IndexOutOfRange {
                index,
                len: self.waves.len(),
            });
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a WaveLayerStack {
    type Item = &'a Wave;
    type IntoIter = std::slice::Iter<'a, Wave>;

    fn into_iter(self) -> Self::IntoIter {
        self.waves.iter()
    }
}
