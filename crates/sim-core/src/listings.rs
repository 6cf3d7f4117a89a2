//! Market-side structures: buyers, sellers, bids, and the category board.
//!
//! Sellers are partitioned into `(dwelling type, rooms)` categories; rooms
//! are clamped into `[0, max_bedrooms)`. Each seller owns a bid list behind
//! its own mutex so the parallel choice-set phase can insert concurrently
//! with a short critical section per list.

use parking_lot::Mutex;
use smallvec::SmallVec;
use std::cmp::Ordering;
use types::{DwellingId, DwellingType, HouseholdId};

// =============================================================================
// Participants
// =============================================================================

/// A household looking to buy this month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Buyer {
    pub household: HouseholdId,
    /// Set when the participation model flagged the household as demanding
    /// more space; shifts the eligible room band up by one.
    pub wants_larger: bool,
}

/// A dwelling offered for sale this month.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Seller {
    pub dwelling: DwellingId,
    /// Advertised price after time-on-market decay.
    pub asking: f32,
    /// Bids below this are rejected at choice-set time.
    pub minimum: f32,
}

// =============================================================================
// Bids
// =============================================================================

/// A buyer's offer on one seller in one category.
///
/// Ordering is higher amount first, ties broken by higher buyer index. The
/// buyer-index tie-break makes the sort total and independent of insertion
/// order, so the parallel insertion phase cannot race the final ordering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bid {
    pub amount: f32,
    /// Seller index within the category.
    pub seller: i32,
    /// Buyer index within this month's buyer list.
    pub buyer: i32,
}

impl Bid {
    /// Comparator placing the winning bid first.
    #[inline]
    pub fn cmp_desc(a: &Bid, b: &Bid) -> Ordering {
        b.amount
            .total_cmp(&a.amount)
            .then_with(|| b.buyer.cmp(&a.buyer))
    }

    /// True when `self` outranks `other` in a seller's list.
    #[inline]
    pub fn ranks_above(&self, other: &Bid) -> bool {
        Bid::cmp_desc(self, other) == Ordering::Less
    }
}

/// Per-seller bid list; short in practice, so inline storage.
pub type BidList = SmallVec<[Bid; 8]>;

// =============================================================================
// Seller board
// =============================================================================

/// Sellers partitioned by `(type, rooms)` with per-seller bid lists.
#[derive(Debug)]
pub struct SellerBoard {
    max_bedrooms: u32,
    /// `DwellingType::COUNT * max_bedrooms` categories in fixed order.
    categories: Vec<Vec<Seller>>,
    /// Bid lists, same shape as `categories`.
    bids: Vec<Vec<Mutex<BidList>>>,
}

impl SellerBoard {
    /// An empty board with `5 * max_bedrooms` categories.
    pub fn new(max_bedrooms: u32) -> Self {
        let count = DwellingType::COUNT * max_bedrooms as usize;
        Self {
            max_bedrooms,
            categories: (0..count).map(|_| Vec::new()).collect(),
            bids: (0..count).map(|_| Vec::new()).collect(),
        }
    }

    /// Category ceiling on rooms.
    #[inline]
    pub fn max_bedrooms(&self) -> u32 {
        self.max_bedrooms
    }

    /// Number of categories (fixed at construction).
    #[inline]
    pub fn category_count(&self) -> usize {
        self.categories.len()
    }

    /// Category index for a type and room count; rooms clamp into
    /// `[0, max_bedrooms)`.
    #[inline]
    pub fn category_of(&self, ty: DwellingType, rooms: u32) -> usize {
        let rooms = rooms.min(self.max_bedrooms.saturating_sub(1));
        ty.index() * self.max_bedrooms as usize + rooms as usize
    }

    /// Add a seller under its `(type, rooms)` category.
    pub fn push_seller(&mut self, ty: DwellingType, rooms: u32, seller: Seller) {
        let category = self.category_of(ty, rooms);
        self.categories[category].push(seller);
        self.bids[category].push(Mutex::new(BidList::new()));
    }

    /// Sellers in one category.
    #[inline]
    pub fn sellers(&self, category: usize) -> &[Seller] {
        &self.categories[category]
    }

    /// The bid list of one seller.
    #[inline]
    pub fn bid_list(&self, category: usize, seller: usize) -> &Mutex<BidList> {
        &self.bids[category][seller]
    }

    /// Total sellers across all categories.
    pub fn seller_count(&self) -> usize {
        self.categories.iter().map(Vec::len).sum()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.seller_count() == 0
    }

    /// Every listed dwelling, in category order.
    pub fn listed_dwellings(&self) -> impl Iterator<Item = DwellingId> + '_ {
        self.categories
            .iter()
            .flatten()
            .map(|seller| seller.dwelling)
    }

    /// Apply `f` to every bid list, potentially in parallel. Each list is
    /// locked for the duration of its call.
    pub fn for_each_bid_list<F>(&self, f: F, force_sequential: bool)
    where
        F: Fn(&mut BidList) + Sync + Send,
    {
        let lists: Vec<&Mutex<BidList>> = self.bids.iter().flatten().collect();
        parallel::for_each_slice(&lists, |list| f(&mut list.lock()), force_sequential);
    }

    /// Sort every seller's bid list into auction order.
    pub fn sort_bids(&self, force_sequential: bool) {
        self.for_each_bid_list(
            |list| list.sort_unstable_by(Bid::cmp_desc),
            force_sequential,
        );
    }
}
