use rand::Rng;

/// Candidats pondérés, tirés sans remise : chaque tirage retire le candidat,
/// la réserve rétrécit strictement.
#[derive(Debug, Clone)]
pub(super) struct WeightedPool<T> {
    items: Vec<(T, u32)>,
}

impl<T> WeightedPool<T> {
    pub(super) fn new<I: IntoIterator<Item = (T, u32)>>(items: I) -> Self {
        Self {
            items: items.into_iter().collect(),
        }
    }

    pub(super) fn len(&self) -> usize {
        self.items.len()
    }

    pub(super) fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Retire le dernier candidat restant, sans tirage.
    pub(super) fn take_sole(&mut self) -> Option<T> {
        self.items.pop().map(|(item, _)| item)
    }

    /// Tirage proportionnel au poids. Si tous les poids restants sont nuls,
    /// tirage uniforme.
    pub(super) fn take<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<T> {
        if self.items.is_empty() {
            return None;
        }
        let total: u64 = self.items.iter().map(|(_, w)| u64::from(*w)).sum();
        let idx = if total == 0 {
            rng.random_range(0..self.items.len())
        } else {
            let mut target = rng.random_range(0..total);
            self.items
                .iter()
                .position(|(_, w)| {
                    let w = u64::from(*w);
                    if target < w {
                        true
                    } else {
                        target -= w;
                        false
                    }
                })
                .unwrap_or(self.items.len() - 1)
        };
        Some(self.items.swap_remove(idx).0)
    }
}
