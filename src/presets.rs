// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::Kind;

/// A form button: one click records `kind` under `category`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preset {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: Kind,
    pub category: &'static str,
}

pub const PRESETS: &[Preset] = &[
    Preset { key: "gasolina", label: "Gasolina", kind: Kind::Expense, category: "Gasolina" },
    Preset { key: "carro", label: "Mant. Carro", kind: Kind::Expense, category: "Carro Repuestos" },
    Preset { key: "moto", label: "Gastos Moto", kind: Kind::Expense, category: "Moto Repuestos" },
    Preset { key: "cashea", label: "Pago Cashea", kind: Kind::Expense, category: "Cashea" },
    Preset { key: "comida", label: "Comida", kind: Kind::Expense, category: "Comida" },
    Preset { key: "salidas", label: "Salidas", kind: Kind::Expense, category: "Entretenimiento" },
    Preset { key: "creditos", label: "Créditos", kind: Kind::Expense, category: "Créditos" },
    Preset { key: "oficina", label: "Inversión Ofic.", kind: Kind::Investment, category: "Oficina" },
    Preset { key: "salud", label: "Salud", kind: Kind::Expense, category: "Salud" },
    Preset { key: "vehiculo", label: "Otros Vehículo", kind: Kind::Expense, category: "Vehículo General" },
    Preset { key: "venta-divisas", label: "Venta Divisas (Salida)", kind: Kind::Expense, category: "Venta Divisas" },
    Preset { key: "compra-divisas", label: "Compra Divisas (Ahorro)", kind: Kind::Saving, category: "Compra Divisas" },
    Preset { key: "quincena", label: "Ingreso Quincena", kind: Kind::Income, category: "Salario" },
    Preset { key: "ahorros", label: "Otros Ahorros", kind: Kind::Saving, category: "Fondo Ahorro" },
];

pub fn find(key: &str) -> Option<&'static Preset> {
    let key = key.trim();
    PRESETS
        .iter()
        .find(|p| p.key.eq_ignore_ascii_case(key) || p.category.eq_ignore_ascii_case(key))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_unique() {
        for (i, p) in PRESETS.iter().enumerate() {
            assert!(PRESETS[i + 1..].iter().all(|q| q.key != p.key), "{}", p.key);
        }
    }

    #[test]
    fn lookup_by_key_or_category() {
        assert_eq!(find("quincena").unwrap().category, "Salario");
        assert_eq!(find("salario").unwrap().kind, Kind::Income);
        assert_eq!(find(" Oficina ").unwrap().kind, Kind::Investment);
        assert!(find("lotería").is_none());
    }
}
