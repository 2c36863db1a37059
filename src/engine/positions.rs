use crate::domain::SeatIndex;

/// Следующее место по кругу.
pub fn next_seat(current: SeatIndex, player_count: usize) -> SeatIndex {
    if player_count == 0 {
        return 0;
    }
    ((current as usize + 1) % player_count) as SeatIndex
}

/// Предыдущее место по кругу.
pub fn prev_seat(current: SeatIndex, player_count: usize) -> SeatIndex {
    if player_count == 0 {
        return 0;
    }
    ((current as usize + player_count - 1) % player_count) as SeatIndex
}
