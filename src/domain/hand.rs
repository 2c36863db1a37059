use serde::{Deserialize, Serialize};

use crate::domain::card::Card;
use crate::domain::SlotIndex;

/// Карта, лежащая в слоте руки, вместе с ориентацией.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct HandCard {
    pub card: Card,
    pub face_up: bool,
}

impl HandCard {
    pub fn face_down(card: Card) -> Self {
        Self {
            card,
            face_up: false,
        }
    }
}

/// Рука игрока: упорядоченные слоты фиксированной длины.
///
/// `None` в слоте — "надгробие": карта ушла, но индекс слота сохраняется.
/// Длина меняется только через `add`, когда свободных надгробий нет.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Hand {
    pub slots: Vec<Option<HandCard>>,
}

impl Hand {
    /// Рука из розданных карт, все рубашкой вверх.
    pub fn dealt(cards: Vec<Card>) -> Self {
        Self {
            slots: cards.into_iter().map(|c| Some(HandCard::face_down(c))).collect(),
        }
    }

    /// Количество слотов (включая надгробия).
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Сколько слотов реально занято картами.
    pub fn occupied_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn has_slot(&self, slot: SlotIndex) -> bool {
        (slot as usize) < self.slots.len()
    }

    /// Карта в слоте (None — надгробие или слота нет).
    pub fn get(&self, slot: SlotIndex) -> Option<&HandCard> {
        self.slots.get(slot as usize).and_then(|s| s.as_ref())
    }

    pub fn is_occupied(&self, slot: SlotIndex) -> bool {
        self.get(slot).is_some()
    }

    /// Индексы занятых слотов.
    pub fn occupied_slots(&self) -> impl Iterator<Item = SlotIndex> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, s)| s.is_some())
            .map(|(i, _)| i as SlotIndex)
    }

    /// Все карты руки (без надгробий).
    pub fn cards(&self) -> impl Iterator<Item = &Card> + '_ {
        self.slots.iter().flatten().map(|hc| &hc.card)
    }

    /// Снять карту со слота. На месте остаётся надгробие.
    pub fn take(&mut self, slot: SlotIndex) -> Option<Card> {
        self.slots
            .get_mut(slot as usize)
            .and_then(|s| s.take())
            .map(|hc| hc.card)
    }

    /// Заменить карту в занятом слоте (новая карта рубашкой вверх).
    /// Возвращает вытесненную карту; для надгробия ничего не меняет.
    pub fn replace(&mut self, slot: SlotIndex, card: Card) -> Option<Card> {
        let entry = self.slots.get_mut(slot as usize)?;
        let old = entry.take()?;
        *entry = Some(HandCard::face_down(card));
        Some(old.card)
    }

    /// Положить карту в надгробие. Возвращает карту обратно, если слот занят
    /// или его нет.
    pub fn place(&mut self, slot: SlotIndex, card: Card) -> Result<(), Card> {
        match self.slots.get_mut(slot as usize) {
            Some(entry) if entry.is_none() => {
                *entry = Some(HandCard::face_down(card));
                Ok(())
            }
            _ => Err(card),
        }
    }

    /// Добавить карту в первое надгробие, а если их нет — в конец руки.
    pub fn add(&mut self, card: Card) -> SlotIndex {
        if let Some(idx) = self.slots.iter().position(|s| s.is_none()) {
            self.slots[idx] = Some(HandCard::face_down(card));
            idx as SlotIndex
        } else {
            self.slots.push(Some(HandCard::face_down(card)));
            (self.slots.len() - 1) as SlotIndex
        }
    }

    /// Открыть все карты (конец матча).
    pub fn reveal_all(&mut self) {
        for hc in self.slots.iter_mut().flatten() {
            hc.face_up = true;
        }
    }
}
