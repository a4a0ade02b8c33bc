use crate::model::Element;

/// Owns the placed elements in paint order. Later elements are drawn on top
/// and win hit-test ties.
#[derive(Clone, Debug, PartialEq)]
pub struct ElementStore {
    elements: Vec<Element>,
    next_id: u64,
}

impl Default for ElementStore {
    fn default() -> Self {
        Self {
            elements: Vec::new(),
            next_id: 1,
        }
    }
}

impl ElementStore {
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    pub fn get(&self, index: usize) -> Option<&Element> {
        self.elements.get(index)
    }

    pub fn index_of(&self, id: u64) -> Option<usize> {
        self.elements.iter().position(|e| e.id == id)
    }

    pub fn get_by_id(&self, id: u64) -> Option<&Element> {
        self.elements.iter().find(|e| e.id == id)
    }

    pub fn get_mut_by_id(&mut self, id: u64) -> Option<&mut Element> {
        self.elements.iter_mut().find(|e| e.id == id)
    }

    /// Appends `element` under a freshly allocated id, ignoring whatever id
    /// it carried.
    pub fn add(&mut self, mut element: Element) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        element.id = id;
        self.elements.push(element);
        id
    }

    /// Removes the element at `index`. Every later index shifts down by one.
    pub fn remove(&mut self, index: usize) -> Option<Element> {
        if index < self.elements.len() {
            Some(self.elements.remove(index))
        } else {
            None
        }
    }

    pub fn replace_all(&mut self, elements: Vec<Element>) {
        self.next_id = elements.iter().map(|e| e.id).max().map_or(1, |id| id.saturating_add(1));
        self.elements = elements;
    }

    pub fn clear(&mut self) {
        self.elements.clear();
        self.next_id = 1;
    }
}
