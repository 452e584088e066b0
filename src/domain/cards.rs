/// Program cards: the vocabulary players program robots with.
///
/// A card is a kind plus a priority number. Priorities are drawn from
/// disjoint per-kind bands (turns low, big moves high); within one
/// register phase, higher priority acts first.

use rand::Rng;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum CardKind {
    Move1,
    Move2,
    Move3,
    BackUp,
    RotateRight,
    RotateLeft,
    UTurn,
}

/// What a card asks the movement engine to do.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Instruction {
    Move(i32),
    Rotate(i32),
}

impl CardKind {
    pub const ALL: [CardKind; 7] = [
        CardKind::Move1,
        CardKind::Move2,
        CardKind::Move3,
        CardKind::BackUp,
        CardKind::RotateRight,
        CardKind::RotateLeft,
        CardKind::UTurn,
    ];

    /// Engine instruction this card issues. Negative move counts walk
    /// backward; rotation steps are clockwise quarter turns.
    pub fn instruction(self) -> Instruction {
        match self {
            CardKind::Move1 => Instruction::Move(1),
            CardKind::Move2 => Instruction::Move(2),
            CardKind::Move3 => Instruction::Move(3),
            CardKind::BackUp => Instruction::Move(-1),
            CardKind::RotateRight => Instruction::Rotate(1),
            CardKind::RotateLeft => Instruction::Rotate(-1),
            CardKind::UTurn => Instruction::Rotate(2),
        }
    }

    /// Inclusive priority band for this kind.
    pub fn priority_band(self) -> (u16, u16) {
        match self {
            CardKind::UTurn => (10, 60),
            CardKind::RotateRight | CardKind::RotateLeft => (70, 410),
            CardKind::BackUp => (430, 480),
            CardKind::Move1 => (490, 650),
            CardKind::Move2 => (670, 780),
            CardKind::Move3 => (790, 840),
        }
    }

    /// Short label for the HUD card row.
    pub fn label(self) -> &'static str {
        match self {
            CardKind::Move1 => "MOVE 1",
            CardKind::Move2 => "MOVE 2",
            CardKind::Move3 => "MOVE 3",
            CardKind::BackUp => "BACK UP",
            CardKind::RotateRight => "TURN R",
            CardKind::RotateLeft => "TURN L",
            CardKind::UTurn => "U-TURN",
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Card {
    pub kind: CardKind,
    pub priority: u16,
}

impl Card {
    /// Draw one random card: weighted kind (movement-heavy mix), then
    /// a uniform priority inside the kind's band.
    pub fn deal(rng: &mut impl Rng) -> Card {
        let kind = match rng.gen_range(0..100) {
            0..=21 => CardKind::Move1,       // 22%
            22..=37 => CardKind::Move2,      // 16%
            38..=47 => CardKind::Move3,      // 10%
            48..=57 => CardKind::BackUp,     // 10%
            58..=73 => CardKind::RotateRight, // 16%
            74..=89 => CardKind::RotateLeft, // 16%
            _ => CardKind::UTurn,            // 10%
        };
        let (lo, hi) = kind.priority_band();
        Card {
            kind,
            priority: rng.gen_range(lo..=hi),
        }
    }
}

/// Deal a full hand.
pub fn deal_hand(rng: &mut impl Rng, size: usize) -> Vec<Card> {
    (0..size).map(|_| Card::deal(rng)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn instruction_mapping() {
        assert_eq!(CardKind::Move1.instruction(), Instruction::Move(1));
        assert_eq!(CardKind::Move2.instruction(), Instruction::Move(2));
        assert_eq!(CardKind::Move3.instruction(), Instruction::Move(3));
        assert_eq!(CardKind::BackUp.instruction(), Instruction::Move(-1));
        assert_eq!(CardKind::RotateRight.instruction(), Instruction::Rotate(1));
        assert_eq!(CardKind::RotateLeft.instruction(), Instruction::Rotate(-1));
        assert_eq!(CardKind::UTurn.instruction(), Instruction::Rotate(2));
    }

    #[test]
    fn priorities_stay_inside_the_band() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..2000 {
            let card = Card::deal(&mut rng);
            let (lo, hi) = card.kind.priority_band();
            assert!(card.priority >= lo && card.priority <= hi, "{:?}", card);
        }
    }

    #[test]
    fn every_kind_shows_up_in_a_long_deal() {
        let mut rng = StdRng::seed_from_u64(42);
        let dealt = deal_hand(&mut rng, 2000);
        for kind in CardKind::ALL {
            assert!(dealt.iter().any(|c| c.kind == kind), "{:?} never dealt", kind);
        }
    }

    #[test]
    fn bands_order_turns_below_moves() {
        // Any movement card outranks any turn card
        let (_, turn_hi) = CardKind::RotateRight.priority_band();
        let (backup_lo, _) = CardKind::BackUp.priority_band();
        let (_, move2_hi) = CardKind::Move2.priority_band();
        let (move3_lo, _) = CardKind::Move3.priority_band();
        assert!(turn_hi < backup_lo);
        assert!(move2_hi < move3_lo);
    }

    #[test]
    fn hand_size_respected() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(deal_hand(&mut rng, 7).len(), 7);
        assert!(deal_hand(&mut rng, 0).is_empty());
    }
}
