/// Products each cafeteria can order, in display order.
#[derive(Debug, Clone)]
pub struct Catalog {
    entries: Vec<(String, Vec<String>)>,
}

const BUILTIN: &[(&str, &[&str])] = &[
    (
        "Breck",
        &[
            "Croissant",
            "Chocolatín",
            "Hogaza",
            "Foccacia",
            "Brioche",
            "Croissant Almendra",
            "Galleta Chispas",
            "Galleta Chispas",
        ],
    ),
    (
        "Cafe del sur",
        &[
            "Croissant",
            "Demi baguette",
            "Baguette",
            "Caja Blanco",
            "Caja Multigrano",
            "Bollo",
            "Ciabatta",
        ],
    ),
    (
        "Amïn",
        &[
            "Croissant",
            "chocolarín",
            "Croissant Almendra",
            "Croissant Frutal",
            "Croissant Chocolate",
            "Chocolatín Almendra",
            "Scone",
            "Tartas Rústica",
            "Cocada",
            "Rol de Canela",
            "Galleta Chispas",
            "Galleta Avena",
            "Galleta Red Velvet",
            "Galleta Doble Chocolate",
            "Panque Zanahoria",
            "Panque Plátano",
            "Panque Limón",
            "Hogaza",
            "Ciabatta",
        ],
    ),
    ("Blom", &["Croissant", "Chocolatín", "Scone", "Galleta"]),
    ("Charcuteri", &["Croissant"]),
    ("Ponke", &["Hogaza", "Baguette", "Brioche", "Scone", "Tarta Rústica"]),
    (
        "Zuzu",
        &[
            "Croissant",
            "Chocolatín",
            "Croissant Almendra",
            "Croissant Frutal",
            "Scone",
            "Muffin",
            "Croapan",
            "Rol de Canela",
        ],
    ),
    ("Versal", &["Hogaza"]),
    ("Taperia", &["Baguette"]),
    ("Panza", &["Croissant", "Chocolatín"]),
];

impl Catalog {
    pub fn builtin() -> Self {
        Self::from_entries(
            BUILTIN
                .iter()
                .map(|(name, products)| (name.to_string(), products.iter().map(|p| p.to_string()).collect())),
        )
    }

    pub fn from_entries(entries: impl IntoIterator<Item = (String, Vec<String>)>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    pub fn cafeterias(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn contains_cafeteria(&self, cafeteria: &str) -> bool {
        self.entries.iter().any(|(name, _)| name == cafeteria)
    }

    /// The cafeteria's products with repeats removed, first occurrence wins.
    pub fn products(&self, cafeteria: &str) -> Option<Vec<&str>> {
        let (_, products) = self.entries.iter().find(|(name, _)| name == cafeteria)?;
        let mut unique: Vec<&str> = Vec::with_capacity(products.len());
        for product in products {
            if !unique.contains(&product.as_str()) {
                unique.push(product.as_str());
            }
        }
        Some(unique)
    }

    pub fn contains_product(&self, cafeteria: &str, product: &str) -> bool {
        self.products(cafeteria)
            .is_some_and(|products| products.contains(&product))
    }
}

/// Stable element id for a product row.
pub fn product_slug(product: &str) -> String {
    product.split_whitespace().collect::<Vec<_>>().join("-")
}
