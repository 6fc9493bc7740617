//! Anatomical connections between BlazePose landmarks.

/// Landmark index pairs joined by a skeleton line.
pub const POSE_CONNECTIONS: [(usize, usize); 35] = [
    // face
    (0, 1),
    (1, 2),
    (2, 3),
    (3, 7),
    (0, 4),
    (4, 5),
    (5, 6),
    (6, 8),
    (9, 10),
    // arms and hands
    (11, 12),
    (11, 13),
    (13, 15),
    (15, 17),
    (15, 19),
    (15, 21),
    (17, 19),
    (12, 14),
    (14, 16),
    (16, 18),
    (16, 20),
    (16, 22),
    (18, 20),
    // torso
    (11, 23),
    (12, 24),
    (23, 24),
    // legs and feet
    (23, 25),
    (24, 26),
    (25, 27),
    (26, 28),
    (27, 29),
    (28, 30),
    (29, 31),
    (30, 32),
    (27, 31),
    (28, 32),
];

/// Connections whose endpoints both fall below `landmark_count`.
pub fn connections_within(topology: &[(usize, usize)], landmark_count: usize) -> Vec<(usize, usize)> {
    topology
        .iter()
        .copied()
        .filter(|&(a, b)| a < landmark_count && b < landmark_count)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::constants::{FULL_BODY_LANDMARKS, UPPER_BODY_LANDMARKS};

    #[test]
    fn test_all_connections_reference_valid_landmarks() {
        for (a, b) in POSE_CONNECTIONS {
            assert!(a < FULL_BODY_LANDMARKS && b < FULL_BODY_LANDMARKS);
            assert_ne!(a, b);
        }
    }

    #[test]
    fn test_no_duplicate_connections() {
        for (i, &(a, b)) in POSE_CONNECTIONS.iter().enumerate() {
            for &(c, d) in &POSE_CONNECTIONS[i + 1..] {
                assert!(!((a == c && b == d) || (a == d && b == c)));
            }
        }
    }

    #[test]
    fn test_upper_body_drops_legs() {
        let upper = connections_within(&POSE_CONNECTIONS, UPPER_BODY_LANDMARKS);
        assert_eq!(upper.len(), 25);
        assert!(upper.contains(&(23, 24)));
        assert!(!upper.contains(&(23, 25)));
    }

    #[test]
    fn test_full_body_keeps_everything() {
        let all = connections_within(&POSE_CONNECTIONS, FULL_BODY_LANDMARKS);
        assert_eq!(all.len(), POSE_CONNECTIONS.len());
    }
}
