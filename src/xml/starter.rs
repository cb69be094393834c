//! Authoring templates for new XML documents

use crate::core::identity::DocumentKind;

/// Get a starter XML skeleton for hand-authoring a document of the given
/// kind. The skeletons parse cleanly through the mapper.
pub fn starter_template(kind: DocumentKind) -> &'static str {
    match kind {
        DocumentKind::Dataset => DATASET_TEMPLATE,
        DocumentKind::Category => CATEGORY_TEMPLATE,
    }
}

const DATASET_TEMPLATE: &str = r##"<?xml version="1.0" encoding="UTF-8"?>
<dataset>
  <metadata>
    <title>Título del dataset</title>
    <description>Descripción detallada del dataset</description>
    <category>Demografia</category>
    <source>Fuente de los datos</source>
    <updated>2025-01-01</updated>
    <license>CC BY 4.0</license>
    <tags>tag1, tag2, tag3</tags>
    <contact>email@ejemplo.com</contact>
  </metadata>

  <visualization>
    <type>bar</type>
    <config>
      <title>Título del gráfico</title>
      <xAxis>Eje X</xAxis>
      <yAxis>Eje Y</yAxis>
      <colors>["#2C5F2D", "#97BC62", "#F4A261"]</colors>
    </config>
  </visualization>

  <data>
    <json>
    [
      {"campo1": "valor1", "campo2": 100},
      {"campo1": "valor2", "campo2": 200}
    ]
    </json>
  </data>
</dataset>"##;

const CATEGORY_TEMPLATE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<category>
  <name>Nombre de la categoría</name>
  <description>Descripción de la categoría</description>
  <icon>📊</icon>
  <color>#2C5F2D</color>
</category>"#;
