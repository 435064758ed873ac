/// Binary min-heap over a `Vec`, smallest element at index 0.
#[derive(Debug, Clone)]
pub struct MinHeap<T> {
    elements: Vec<T>,
}

impl<T> MinHeap<T> {
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    fn parent(i: usize) -> usize {
        (i - 1) / 2
    }

    fn left(i: usize) -> usize {
        2 * i + 1
    }

    fn right(i: usize) -> usize {
        2 * i + 2
    }
}

impl<T: Ord> MinHeap<T> {
    /// Heapifies `source` in place, O(n).
    pub fn build(source: Vec<T>) -> Self {
        let mut heap = MinHeap { elements: source };
        for i in (0..heap.len() / 2).rev() {
            heap.sift_down(i);
        }
        heap
    }

    pub fn is_valid(&self) -> bool {
        (1..self.len()).all(|i| self.elements[Self::parent(i)] <= self.elements[i])
    }

    fn sift_down(&mut self, mut i: usize) {
        loop {
            let l = Self::left(i);
            let r = Self::right(i);
            let mut smallest = i;

            if l < self.len() && self.elements[l] < self.elements[smallest] {
                smallest = l;
            }
            if r < self.len() && self.elements[r] < self.elements[smallest] {
                smallest = r;
            }
            if smallest == i {
                return;
            }
            self.elements.swap(i, smallest);
            i = smallest;
        }
    }

    fn sift_up(&mut self, mut i: usize) {
        while i > 0 {
            let p = Self::parent(i);
            if self.elements[i] >= self.elements[p] {
                return;
            }
            self.elements.swap(i, p);
            i = p;
        }
    }

    pub fn insert(&mut self, value: T) {
        self.elements.push(value);
        self.sift_up(self.len() - 1);
        debug_assert!(self.is_valid());
    }

    pub fn extract_min(&mut self) -> Option<T> {
        if self.elements.is_empty() {
            return None;
        }
        let last = self.len() - 1;
        self.elements.swap(0, last);
        let result = self.elements.pop();
        self.sift_down(0);
        result
    }

    /// Consumes the heap, returning its only element. `None` unless exactly one is left.
    pub fn into_single(mut self) -> Option<T> {
        match self.len() {
            1 => self.elements.pop(),
            _ => None,
        }
    }
}
