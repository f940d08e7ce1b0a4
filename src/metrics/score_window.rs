/// Fixed-capacity ring buffer of the most recent episode scores.
///
/// Once full, every push evicts the oldest score. Iteration runs from oldest
/// to newest.
#[derive(Clone, Debug, PartialEq)]
pub struct ScoreWindow {
    slots: Vec<f32>,
    capacity: usize,
    /// Index of the oldest score once the window is full
    head: usize,
}

impl ScoreWindow {
    /// Window size used for the running average during training.
    pub const DEFAULT_CAPACITY: usize = 100;

    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        ScoreWindow {
            slots: Vec::with_capacity(capacity),
            capacity,
            head: 0,
        }
    }

    /// Append `score`, returning the evicted score if the window was full.
    pub fn push(&mut self, score: f32) -> Option<f32> {
        if self.slots.len() < self.capacity {
            self.slots.push(score);
            return None;
        }
        let evicted = std::mem::replace(&mut self.slots[self.head], score);
        self.head = (self.head + 1) % self.capacity;
        Some(evicted)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.slots.len() == self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn iter(&self) -> impl Iterator<Item = f32> + '_ {
        let (newer, older) = self.slots.split_at(self.head);
        older.iter().chain(newer.iter()).copied()
    }

    /// Mean of the scores in the window, `None` while empty.
    pub fn mean(&self) -> Option<f32> {
        if self.slots.is_empty() {
            return None;
        }
        let sum: f64 = self.slots.iter().map(|&s| s as f64).sum();
        Some((sum / self.slots.len() as f64) as f32)
    }
}

impl Default for ScoreWindow {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}
